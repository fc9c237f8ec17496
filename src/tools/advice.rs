//! Food advice tool
//!
//! Turns a meal photo and a health profile into dietary advice with two
//! dependent model calls: detect the food items, then ask for advice about
//! them. Any failure aborts the whole analysis.

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::ImageFormat;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::llm::{ChatCompletionRequest, ChatMessage, ContentPart, ModelClient, ModelError};
use crate::models::{DietaryAdvice, FoodAnalysis, FoodDetectionResult, HealthProfile, ProfileError};

/// Instruction sent with the image
pub const DETECTION_PROMPT: &str =
    "What are the food items present in the image? Describe each food item(s) in 4-5 words.";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_DETECTION_MAX_TOKENS: u32 = 300;
pub const DEFAULT_ADVICE_MAX_TOKENS: u32 = 1000;

/// Analysis errors
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("{0}")]
    InputIncomplete(#[from] ProfileError),

    #[error("Unsupported image: expected a JPEG or PNG upload")]
    UnsupportedImage,

    #[error("Food detection failed: {0}")]
    DetectionFailed(#[source] ModelError),

    #[error("Dietary advice failed: {0}")]
    AdviceFailed(#[source] ModelError),
}

/// Model name and output caps for the two calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorSettings {
    pub model: String,
    pub detection_max_tokens: u32,
    pub advice_max_tokens: u32,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            detection_max_tokens: DEFAULT_DETECTION_MAX_TOKENS,
            advice_max_tokens: DEFAULT_ADVICE_MAX_TOKENS,
        }
    }
}

/// Accept only the image types the upload form allowed
pub fn check_image(image_bytes: &[u8]) -> Result<ImageFormat, AdvisorError> {
    match image::guess_format(image_bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
        _ => Err(AdvisorError::UnsupportedImage),
    }
}

/// Image as a base64 data URI, always labelled `image/jpeg`
pub fn image_data_uri(image_bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", BASE64.encode(image_bytes))
}

/// Step 1 request: instruction text plus the image
pub fn detection_request(settings: &AdvisorSettings, image_bytes: &[u8]) -> ChatCompletionRequest {
    ChatCompletionRequest::single_turn(
        settings.model.clone(),
        ChatMessage::user_parts(vec![
            ContentPart::text(DETECTION_PROMPT),
            ContentPart::image_url(image_data_uri(image_bytes)),
        ]),
        settings.detection_max_tokens,
    )
}

/// Dietitian prompt with the profile and the detected items interpolated verbatim.
/// Measurements keep their decimal point (`170.0`, not `170`).
pub fn advice_prompt(profile: &HealthProfile, detection: &FoodDetectionResult) -> String {
    format!(
        "Imagine you are an expert dietitian. Given my age ({}), height ({:?} cm), current weight ({:?} kg), \
         target weight ({:?} kg), and my time plan ({:?} months), list down the approximate calories and the \
         glycemic index for the following food items: {}. Also, can I eat these food items and still meet \
         my daily calorie goal?",
        profile.age,
        profile.height_cm,
        profile.weight_kg,
        profile.target_weight_kg,
        profile.time_plan_months,
        detection.joined(),
    )
}

/// Step 2 request: text-only prompt
pub fn advice_request(
    settings: &AdvisorSettings,
    profile: &HealthProfile,
    detection: &FoodDetectionResult,
) -> ChatCompletionRequest {
    ChatCompletionRequest::single_turn(
        settings.model.clone(),
        ChatMessage::user(advice_prompt(profile, detection)),
        settings.advice_max_tokens,
    )
}

/// Two-step food analysis against one model endpoint
#[derive(Clone)]
pub struct FoodAdvisor {
    client: Arc<dyn ModelClient>,
    settings: AdvisorSettings,
}

impl FoodAdvisor {
    pub fn new(client: Arc<dyn ModelClient>, settings: AdvisorSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    /// Detected items only (step 1)
    #[instrument(skip_all, fields(image_bytes = image_bytes.len()))]
    pub async fn detect(&self, image_bytes: &[u8]) -> Result<FoodDetectionResult, AdvisorError> {
        check_image(image_bytes)?;

        let request = detection_request(&self.settings, image_bytes);
        let reply = self.client.complete(&request).await.map_err(|e| {
            warn!("food detection failed: {}", e);
            AdvisorError::DetectionFailed(e)
        })?;

        let detection = FoodDetectionResult::parse(&reply);
        info!(items = detection.len(), "detected food items: {}", detection.raw);
        Ok(detection)
    }

    /// Full analysis returning both the detection and the advice
    pub async fn analyze_with_detection(
        &self,
        image_bytes: &[u8],
        profile: &HealthProfile,
    ) -> Result<FoodAnalysis, AdvisorError> {
        profile.validate()?;
        let detection = self.detect(image_bytes).await?;

        let request = advice_request(&self.settings, profile, &detection);
        let advice = self.client.complete(&request).await.map_err(|e| {
            warn!("dietary advice failed: {}", e);
            AdvisorError::AdviceFailed(e)
        })?;

        info!(chars = advice.len(), "dietary advice received");
        Ok(FoodAnalysis {
            detection,
            advice: DietaryAdvice(advice),
        })
    }

    /// Advice for the meal in `image_bytes`
    pub async fn analyze(
        &self,
        image_bytes: &[u8],
        profile: &HealthProfile,
    ) -> Result<DietaryAdvice, AdvisorError> {
        Ok(self.analyze_with_detection(image_bytes, profile).await?.advice)
    }
}

/// Response for analyze_food_image
#[derive(Debug, Serialize)]
pub struct AnalyzeFoodResponse {
    pub detected_items: Vec<String>,
    pub detection_text: String,
    pub advice: String,
}

impl From<FoodAnalysis> for AnalyzeFoodResponse {
    fn from(analysis: FoodAnalysis) -> Self {
        Self {
            detected_items: analysis.detection.items,
            detection_text: analysis.detection.raw,
            advice: analysis.advice.into_inner(),
        }
    }
}

/// Image bytes from a file path or a base64 string (exactly one must be given)
pub fn load_image(image_path: Option<&Path>, image_base64: Option<&str>) -> Result<Vec<u8>, String> {
    match (image_path, image_base64) {
        (Some(path), None) => std::fs::read(path)
            .map_err(|e| format!("Failed to read image '{}': {}", path.display(), e)),
        (None, Some(encoded)) => {
            let encoded = encoded
                .split_once(";base64,")
                .map(|(_, data)| data)
                .unwrap_or(encoded);
            BASE64
                .decode(encoded.trim())
                .map_err(|e| format!("Invalid base64 image: {}", e))
        }
        (Some(_), Some(_)) => Err("Provide either image_path or image_base64, not both".to_string()),
        (None, None) => Err("An image is required: provide image_path or image_base64".to_string()),
    }
}

/// Run the full analysis for the MCP tool
pub async fn analyze_food_image(
    advisor: &FoodAdvisor,
    image_bytes: &[u8],
    profile: &HealthProfile,
) -> Result<AnalyzeFoodResponse, String> {
    advisor
        .analyze_with_detection(image_bytes, profile)
        .await
        .map(AnalyzeFoodResponse::from)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm::MessageContent;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    /// Replays canned replies and records every request
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, ModelError>>>,
        requests: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, ModelError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, ModelError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::Transport("no scripted reply".to_string())))
        }
    }

    fn profile() -> HealthProfile {
        HealthProfile::new(30, 170.0, 80.0, 70.0, 2.0)
    }

    fn advisor(client: Arc<ScriptedClient>) -> FoodAdvisor {
        FoodAdvisor::new(client, AdvisorSettings::default())
    }

    #[tokio::test]
    async fn test_analyze_runs_both_steps() {
        let client = ScriptedClient::new(vec![
            Ok("Apple slice, Grilled chicken, Brown rice".to_string()),
            Ok("About 550 kcal. Yes, within your goal.".to_string()),
        ]);
        let analysis = advisor(client.clone())
            .analyze_with_detection(&PNG_HEADER, &profile())
            .await
            .unwrap();

        assert_eq!(
            analysis.detection.items,
            vec!["Apple slice", "Grilled chicken", "Brown rice"]
        );
        assert_eq!(analysis.advice.as_str(), "About 550 kcal. Yes, within your goal.");
        assert_eq!(client.calls(), 2);

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, 300);
        assert_eq!(requests[1].max_tokens, 1000);
        match &requests[1].messages[0].content {
            MessageContent::Text(prompt) => {
                assert!(prompt.contains("age (30)"));
                assert!(prompt.contains("height (170.0 cm)"));
                assert!(prompt.contains("current weight (80.0 kg)"));
                assert!(prompt.contains("target weight (70.0 kg)"));
                assert!(prompt.contains("time plan (2.0 months)"));
                assert!(prompt.contains("food items: Apple slice, Grilled chicken, Brown rice."));
            }
            other => panic!("advice prompt should be plain text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detection_request_carries_image() {
        let client = ScriptedClient::new(vec![Ok("Toast".to_string()), Ok("fine".to_string())]);
        let advice = advisor(client.clone()).analyze(&JPEG_HEADER, &profile()).await.unwrap();
        assert_eq!(advice.as_str(), "fine");

        let requests = client.requests.lock().unwrap();
        match &requests[0].messages[0].content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts[0], ContentPart::text(DETECTION_PROMPT));
                assert_eq!(parts[1], ContentPart::image_url(image_data_uri(&JPEG_HEADER)));
            }
            other => panic!("detection should be multi-part, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detection_failure_skips_advice() {
        let client = ScriptedClient::new(vec![
            Err(ModelError::Status { status: 500, body: "boom".to_string() }),
            Ok("never used".to_string()),
        ]);
        let err = advisor(client.clone()).analyze(&PNG_HEADER, &profile()).await.unwrap_err();

        assert!(matches!(err, AdvisorError::DetectionFailed(ModelError::Status { status: 500, .. })));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_advice_failure_is_reported() {
        let client = ScriptedClient::new(vec![
            Ok("Pizza".to_string()),
            Err(ModelError::Transport("timed out".to_string())),
        ]);
        let err = advisor(client.clone()).analyze(&PNG_HEADER, &profile()).await.unwrap_err();

        assert!(matches!(err, AdvisorError::AdviceFailed(ModelError::Transport(_))));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_incomplete_profile_makes_no_calls() {
        let client = ScriptedClient::new(vec![]);
        let incomplete = HealthProfile { weight_kg: 0.0, ..profile() };
        let err = advisor(client.clone()).analyze(&PNG_HEADER, &incomplete).await.unwrap_err();

        assert!(matches!(err, AdvisorError::InputIncomplete(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_image_upload_makes_no_calls() {
        let client = ScriptedClient::new(vec![]);
        let err = advisor(client.clone())
            .analyze(b"definitely not an image", &profile())
            .await
            .unwrap_err();

        assert!(matches!(err, AdvisorError::UnsupportedImage));
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn test_advice_prompt_keeps_decimal_measurements() {
        let detection = FoodDetectionResult::parse("Toast, Jam");
        let prompt = advice_prompt(&HealthProfile::new(41, 165.5, 72.25, 65.0, 3.0), &detection);
        assert!(prompt.starts_with(
            "Imagine you are an expert dietitian. Given my age (41), height (165.5 cm), \
             current weight (72.25 kg), target weight (65.0 kg), and my time plan (3.0 months),"
        ));
        assert!(prompt.contains("food items: Toast, Jam."));
    }

    #[test]
    fn test_data_uri_prefix() {
        assert_eq!(image_data_uri(b"abc"), "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn test_check_image_formats() {
        assert_eq!(check_image(&PNG_HEADER).unwrap(), ImageFormat::Png);
        assert_eq!(check_image(&JPEG_HEADER).unwrap(), ImageFormat::Jpeg);
        assert!(check_image(b"GIF89a").is_err());
    }

    #[test]
    fn test_load_image_from_base64_and_data_uri() {
        assert_eq!(load_image(None, Some("YWJj")).unwrap(), b"abc");
        assert_eq!(load_image(None, Some("data:image/png;base64,YWJj")).unwrap(), b"abc");
        assert!(load_image(None, Some("***")).is_err());
    }

    #[test]
    fn test_load_image_requires_exactly_one_source() {
        assert!(load_image(None, None).is_err());
        assert!(load_image(Some(Path::new("a.png")), Some("YWJj")).is_err());
    }

    #[test]
    fn test_load_image_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meal.png");
        std::fs::write(&path, PNG_HEADER).unwrap();
        assert_eq!(load_image(Some(&path), None).unwrap(), PNG_HEADER.to_vec());
    }

    #[tokio::test]
    async fn test_analyze_tool_response() {
        let client = ScriptedClient::new(vec![Ok("Soup, Bread".to_string()), Ok("Fine.".to_string())]);
        let response = analyze_food_image(&advisor(client), &PNG_HEADER, &profile()).await.unwrap();
        assert_eq!(response.detected_items, vec!["Soup", "Bread"]);
        assert_eq!(response.detection_text, "Soup, Bread");
        assert_eq!(response.advice, "Fine.");
    }
}
