//! Evaluation result model.

use serde::{Deserialize, Serialize};

/// Why an evaluation came out the way it did.
///
/// `FlagNotFound` and `Error` are ordinary result values, never raised as
/// errors, so callers cannot mistake "flag absent" for a server fault.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationReason {
    Disabled,
    Targeted,
    RolloutMatch,
    NotInRollout,
    FlagNotFound,
    Error,
}

impl EvaluationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationReason::Disabled => "disabled",
            EvaluationReason::Targeted => "targeted",
            EvaluationReason::RolloutMatch => "rollout_match",
            EvaluationReason::NotInRollout => "not_in_rollout",
            EvaluationReason::FlagNotFound => "flag_not_found",
            EvaluationReason::Error => "error",
        }
    }
}

/// The outcome of evaluating a flag for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// The flag's display name, or the raw lookup key when no flag matched.
    pub feature: String,
    pub enabled: bool,
    pub reason: EvaluationReason,
}

impl EvaluationResult {
    pub fn new(feature: impl Into<String>, enabled: bool, reason: EvaluationReason) -> Self {
        Self {
            feature: feature.into(),
            enabled,
            reason,
        }
    }

    /// Fail-closed result for a key that matched no flag.
    pub fn not_found(flag_key: impl Into<String>) -> Self {
        Self::new(flag_key, false, EvaluationReason::FlagNotFound)
    }

    /// Fail-closed result for an internal failure during evaluation.
    pub fn error(flag_key: impl Into<String>) -> Self {
        Self::new(flag_key, false, EvaluationReason::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_serializes_snake_case() {
        let json = serde_json::to_string(&EvaluationReason::RolloutMatch).unwrap();
        assert_eq!(json, "\"rollout_match\"");
        let json = serde_json::to_string(&EvaluationReason::FlagNotFound).unwrap();
        assert_eq!(json, "\"flag_not_found\"");
    }

    #[test]
    fn test_not_found_is_fail_closed() {
        let result = EvaluationResult::not_found("missing_key");
        assert!(!result.enabled);
        assert_eq!(result.reason, EvaluationReason::FlagNotFound);
        assert_eq!(result.feature, "missing_key");
    }

    #[test]
    fn test_error_is_fail_closed() {
        let result = EvaluationResult::error("some_key");
        assert!(!result.enabled);
        assert_eq!(result.reason, EvaluationReason::Error);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = EvaluationResult::new("Beta", true, EvaluationReason::Targeted);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"feature\":\"Beta\""));
        assert!(json.contains("\"enabled\":true"));
        assert!(json.contains("\"reason\":\"targeted\""));
    }
}
