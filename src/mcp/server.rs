//! EatWise MCP Server Implementation
//!
//! Exposes the energy estimate, the food analysis and the record store as MCP tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::models::{HealthProfile, Namespace};
use crate::store::RecordStore;
use crate::tools::advice::{self, FoodAdvisor};
use crate::tools::energy;
use crate::tools::records;
use crate::tools::status::StatusTracker;

/// EatWise MCP Service
#[derive(Clone)]
pub struct EatwiseService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    store: RecordStore,
    /// `None` when no model API key is configured
    advisor: Option<FoodAdvisor>,
    tool_router: ToolRouter<EatwiseService>,
}

impl EatwiseService {
    pub fn new(store: RecordStore, advisor: Option<FoodAdvisor>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            store,
            advisor,
            tool_router: Self::tool_router(),
        }
    }

    fn model_name(&self) -> Option<&str> {
        self.advisor.as_ref().map(|a| a.settings().model.as_str())
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileParams {
    /// Age in years
    pub age: u32,
    /// Height in centimeters
    pub height_cm: f64,
    /// Current weight in kilograms
    pub weight_kg: f64,
    /// Target weight in kilograms
    pub target_weight_kg: f64,
    /// Months to reach the target weight
    pub time_plan_months: f64,
}

impl From<&ProfileParams> for HealthProfile {
    fn from(p: &ProfileParams) -> Self {
        HealthProfile::new(p.age, p.height_cm, p.weight_kg, p.target_weight_kg, p.time_plan_months)
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateEnergyChartParams {
    #[serde(flatten)]
    pub profile: ProfileParams,
    /// Where to write the PNG
    pub output_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodImageParams {
    #[serde(flatten)]
    pub profile: ProfileParams,
    /// JPEG or PNG file on disk
    pub image_path: Option<String>,
    /// Base64 image, optionally as a data URI
    pub image_base64: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveRecordParams {
    /// JSON object containing a `user_id`
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecordParams {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
struct NotFoundResponse {
    error: String,
    user_id: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl EatwiseService {
    // --- Status ---

    #[tool(description = "Get the current status of the EatWise service including build info, record store, model configuration, and process information")]
    async fn service_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.store, self.model_name());
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for collecting health details and analyzing a meal photo. Call this first when unsure how to use the EatWise tools.")]
    fn advice_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ADVICE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ADVICE_INSTRUCTIONS)]))
    }

    // --- Energy ---

    #[tool(description = "Estimate BMR, maintenance calories and the daily caloric deficit needed to reach a target weight. All five profile values must be greater than zero.")]
    fn estimate_energy(&self, Parameters(p): Parameters<ProfileParams>) -> Result<CallToolResult, McpError> {
        let result = energy::estimate_energy(&HealthProfile::from(&p))
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Write a PNG bar chart of BMR, maintenance calories and daily deficit to output_path")]
    fn generate_energy_chart(&self, Parameters(p): Parameters<GenerateEnergyChartParams>) -> Result<CallToolResult, McpError> {
        let output_path = PathBuf::from(&p.output_path);
        let result = energy::generate_energy_chart(&HealthProfile::from(&p.profile), &output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Food Analysis ---

    #[tool(description = "Detect the food items in a meal photo and get dietary advice (calories, glycemic index, fit with the goal) for the given health profile. Provide image_path or image_base64.")]
    async fn analyze_food_image(&self, Parameters(p): Parameters<AnalyzeFoodImageParams>) -> Result<CallToolResult, McpError> {
        let advisor = self.advisor.as_ref().ok_or_else(|| {
            McpError::internal_error("Food analysis is unavailable: OPENAI_API_KEY is not set", None)
        })?;

        let profile = HealthProfile::from(&p.profile);
        profile
            .validate()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let image_path = p.image_path.as_ref().map(PathBuf::from);
        let image = advice::load_image(image_path.as_deref(), p.image_base64.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;

        let result = advice::analyze_food_image(advisor, &image, &profile)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Records ---

    #[tool(description = "Save (or replace) a user's health details. data must be a JSON object with a user_id.")]
    fn save_health_details(&self, Parameters(p): Parameters<SaveRecordParams>) -> Result<CallToolResult, McpError> {
        let result = records::save_record(&self.store, Namespace::HealthDetails, p.data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a user's saved health details")]
    fn get_health_details(&self, Parameters(p): Parameters<GetRecordParams>) -> Result<CallToolResult, McpError> {
        self.get_record(Namespace::HealthDetails, p.user_id)
    }

    #[tool(description = "Save (or replace) a user's dietary data. data must be a JSON object with a user_id.")]
    fn receive_dietary_data(&self, Parameters(p): Parameters<SaveRecordParams>) -> Result<CallToolResult, McpError> {
        let result = records::save_record(&self.store, Namespace::DietaryData, p.data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a user's saved dietary data")]
    fn get_dietary_data(&self, Parameters(p): Parameters<GetRecordParams>) -> Result<CallToolResult, McpError> {
        self.get_record(Namespace::DietaryData, p.user_id)
    }
}

impl EatwiseService {
    fn get_record(&self, namespace: Namespace, user_id: String) -> Result<CallToolResult, McpError> {
        let result = records::get_record(&self.store, namespace, &user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(record) => to_json(&record),
            None => to_json(&NotFoundResponse {
                error: format!("{} not found", namespace.display_name()),
                user_id,
            }),
        }
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for EatwiseService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "eatwise".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("EatWise".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "EatWise - Should I eat this? \
                 IMPORTANT: Call advice_instructions first. \
                 Energy: estimate_energy, generate_energy_chart. \
                 Food: analyze_food_image (needs all five health details and a JPEG/PNG photo). \
                 Records: save_health_details/get_health_details, receive_dietary_data/get_dietary_data. \
                 Status: service_status."
                    .into(),
            ),
        }
    }
}
