//! Flag endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_flag_evaluation, record_flag_mutation};
use crate::services::FlagService;
use domain::models::{
    CreateFlagRequest, EvaluationResult, FlagResponse, ListFlagsResponse, UpdateFlagRequest,
};

/// List all flags.
///
/// GET /api/v1/flags
pub async fn list_flags(State(state): State<AppState>) -> Result<Json<ListFlagsResponse>, ApiError> {
    let service = FlagService::new(state.pool.clone(), state.cache.clone());
    let flags = service.list().await?;

    let flags: Vec<FlagResponse> = flags.into_iter().map(Into::into).collect();
    let total = flags.len();

    Ok(Json(ListFlagsResponse { flags, total }))
}

/// Create a new flag.
///
/// POST /api/v1/flags
pub async fn create_flag(
    State(state): State<AppState>,
    Json(request): Json<CreateFlagRequest>,
) -> Result<(StatusCode, Json<FlagResponse>), ApiError> {
    request.validate()?;

    let service = FlagService::new(state.pool.clone(), state.cache.clone());
    let flag = service.create(request).await.map_err(|err| {
        let mapped: ApiError = err.into();
        match mapped {
            ApiError::Conflict(_) => {
                ApiError::Conflict("A flag with the same key already exists".to_string())
            }
            other => other,
        }
    })?;

    record_flag_mutation("create");
    Ok((StatusCode::CREATED, Json(flag.into())))
}

/// Update a flag (partial update).
///
/// PUT /api/v1/flags/:id
pub async fn update_flag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateFlagRequest>,
) -> Result<Json<FlagResponse>, ApiError> {
    request.validate()?;

    let service = FlagService::new(state.pool.clone(), state.cache.clone());
    let flag = service
        .update(id, request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flag not found".to_string()))?;

    record_flag_mutation("update");
    Ok(Json(flag.into()))
}

/// Toggle a flag's enabled state.
///
/// POST /api/v1/flags/:id/toggle
pub async fn toggle_flag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FlagResponse>, ApiError> {
    let service = FlagService::new(state.pool.clone(), state.cache.clone());
    let flag = service
        .toggle(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flag not found".to_string()))?;

    record_flag_mutation("toggle");
    Ok(Json(flag.into()))
}

/// Query parameters for flag evaluation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateQuery {
    #[serde(default)]
    pub flag_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Evaluate a flag for a user.
///
/// GET /api/v1/flags/evaluate?flagName=<key>&userId=<id>
///
/// Missing or blank parameters are rejected before the evaluator runs.
/// Present values are passed through verbatim; surrounding whitespace in
/// `userId` is part of the hashed identity.
/// Evaluation itself never fails: unknown keys and store errors come back
/// as ordinary `flag_not_found` / `error` results.
pub async fn evaluate_flag(
    State(state): State<AppState>,
    Query(query): Query<EvaluateQuery>,
) -> Result<Json<EvaluationResult>, ApiError> {
    let flag_name = query.flag_name.as_deref().unwrap_or("");
    let user_id = query.user_id.as_deref().unwrap_or("");
    if flag_name.trim().is_empty() || user_id.trim().is_empty() {
        return Err(ApiError::Validation(
            "flagName and userId are required".to_string(),
        ));
    }

    let service = FlagService::new(state.pool.clone(), state.cache.clone());
    let result = service.evaluate(flag_name, user_id).await;

    record_flag_evaluation(result.reason.as_str());
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_query_deserializes_camel_case() {
        let query: EvaluateQuery =
            serde_json::from_str(r#"{"flagName": "beta", "userId": "alice"}"#).unwrap();
        assert_eq!(query.flag_name.as_deref(), Some("beta"));
        assert_eq!(query.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn test_evaluate_query_tolerates_missing_fields() {
        let query: EvaluateQuery = serde_json::from_str("{}").unwrap();
        assert!(query.flag_name.is_none());
        assert!(query.user_id.is_none());
    }
}
