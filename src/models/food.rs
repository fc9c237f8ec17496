//! Food analysis models
//!
//! Output of the two model calls: the detected items and the advice text.

use serde::{Deserialize, Serialize};

/// Separator the detection reply is split on
pub const ITEM_DELIMITER: &str = ", ";

/// Food items the model saw in the uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDetectionResult {
    /// Reply text exactly as the model returned it
    pub raw: String,
    pub items: Vec<String>,
}

impl FoodDetectionResult {
    /// Split a free-text reply into items.
    ///
    /// The reply is trusted as-is: anything without the delimiter becomes a
    /// single item.
    pub fn parse(reply: &str) -> Self {
        Self {
            raw: reply.to_string(),
            items: reply.split(ITEM_DELIMITER).map(String::from).collect(),
        }
    }

    /// Items joined back with the delimiter, for prompt interpolation
    pub fn joined(&self) -> String {
        self.items.join(ITEM_DELIMITER)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Free-text advice from the second model call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DietaryAdvice(pub String);

impl DietaryAdvice {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DietaryAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detection plus advice for one image
#[derive(Debug, Clone, Serialize)]
pub struct FoodAnalysis {
    pub detection: FoodDetectionResult,
    pub advice: DietaryAdvice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated_reply() {
        let result = FoodDetectionResult::parse("Apple slice, Grilled chicken, Brown rice");
        assert_eq!(result.items, vec!["Apple slice", "Grilled chicken", "Brown rice"]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_unexpected_format_is_single_item() {
        let reply = "1. Apple slice\n2. Grilled chicken";
        let result = FoodDetectionResult::parse(reply);
        assert_eq!(result.items, vec![reply]);
        assert_eq!(result.raw, reply);
    }

    #[test]
    fn test_comma_without_space_is_not_split() {
        let result = FoodDetectionResult::parse("rice,beans");
        assert_eq!(result.items, vec!["rice,beans"]);
    }

    #[test]
    fn test_joined_round_trips_items() {
        let result = FoodDetectionResult::parse("Toast, Butter");
        assert_eq!(result.joined(), "Toast, Butter");
    }

    #[test]
    fn test_advice_serializes_as_plain_string() {
        let advice = DietaryAdvice("Eat half.".to_string());
        assert_eq!(serde_json::to_string(&advice).unwrap(), "\"Eat half.\"");
        assert_eq!(advice.to_string(), "Eat half.");
    }
}
