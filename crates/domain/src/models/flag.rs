//! Feature flag domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Represents a feature flag in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub id: i64,
    /// Mutable display name.
    pub name: String,
    /// Slug derived from the name at creation time. Immutable; never
    /// recomputed on rename, so evaluation keys survive display renames.
    pub key: String,
    pub enabled: bool,
    /// 0-100
    pub rollout_percentage: i32,
    /// Comma-separated list of explicitly targeted user ids.
    pub target_user_ids: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derives the evaluation key (slug) for a flag name: lowercase, keep only
/// alphanumerics and spaces, then spaces become underscores.
pub fn derive_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

fn validate_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        let mut err = validator::ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Request payload for creating a flag.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlagRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "validate_name")
    )]
    pub name: String,

    /// Clamped into [0, 100] by the service rather than rejected.
    #[serde(default)]
    pub rollout_percentage: i32,

    #[serde(default)]
    pub enabled: bool,

    pub target_user_ids: Option<String>,
}

/// Request payload for updating a flag (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlagRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "validate_name")
    )]
    pub name: Option<String>,

    pub rollout_percentage: Option<i32>,

    pub enabled: Option<bool>,

    pub target_user_ids: Option<String>,
}

/// Response payload for flag operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagResponse {
    pub id: i64,
    pub name: String,
    pub key: String,
    pub enabled: bool,
    pub rollout_percentage: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_ids: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Flag> for FlagResponse {
    fn from(f: Flag) -> Self {
        Self {
            id: f.id,
            name: f.name,
            key: f.key,
            enabled: f.enabled,
            rollout_percentage: f.rollout_percentage,
            target_user_ids: f.target_user_ids,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Response payload for listing flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFlagsResponse {
    pub flags: Vec<FlagResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_derive_key_basic() {
        assert_eq!(derive_key("My Feature"), "my_feature");
    }

    #[test]
    fn test_derive_key_strips_punctuation() {
        assert_eq!(derive_key("New Checkout (v2)!"), "new_checkout_v2");
    }

    #[test]
    fn test_derive_key_preserves_digits() {
        assert_eq!(derive_key("Search 2024"), "search_2024");
    }

    #[test]
    fn test_derive_key_already_lowercase() {
        assert_eq!(derive_key("beta"), "beta");
    }

    #[test]
    fn test_create_request_rejects_blank_name() {
        let request = CreateFlagRequest {
            name: "   ".to_string(),
            rollout_percentage: 0,
            enabled: false,
            target_user_ids: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_accepts_valid_name() {
        let request = CreateFlagRequest {
            name: "Beta".to_string(),
            rollout_percentage: 50,
            enabled: true,
            target_user_ids: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_blank_name() {
        let request = UpdateFlagRequest {
            name: Some("".to_string()),
            rollout_percentage: None,
            enabled: None,
            target_user_ids: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_allows_absent_name() {
        let request = UpdateFlagRequest {
            name: None,
            rollout_percentage: Some(30),
            enabled: Some(true),
            target_user_ids: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_deserializes_with_defaults() {
        let request: CreateFlagRequest =
            serde_json::from_str(r#"{"name": "Beta"}"#).unwrap();
        assert_eq!(request.name, "Beta");
        assert_eq!(request.rollout_percentage, 0);
        assert!(!request.enabled);
        assert!(request.target_user_ids.is_none());
    }

    #[test]
    fn test_flag_response_serializes_camel_case() {
        let response = FlagResponse {
            id: 1,
            name: "Beta".to_string(),
            key: "beta".to_string(),
            enabled: true,
            rollout_percentage: 50,
            target_user_ids: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"rolloutPercentage\":50"));
        assert!(!json.contains("targetUserIds"));
    }
}
