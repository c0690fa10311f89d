use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::analyzer::AnalysisError;
use crate::interview::pipeline::PipelineError;
use crate::interview::store::StoreError;
use crate::meeting::MeetingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Meeting provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Transcript not ready")]
    TranscriptNotReady,

    #[error("Malformed analysis response: {0}")]
    MalformedAnalysis(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InterviewNotFound(id) => {
                AppError::NotFound(format!("Interview {id} not found"))
            }
            e @ (PipelineError::MissingMeetingId(_) | PipelineError::TranscriptMissing(_)) => {
                AppError::UnprocessableEntity(e.to_string())
            }
            PipelineError::SchedulingFailed(e) => AppError::ProviderUnavailable(e.to_string()),
            PipelineError::Provider(MeetingError::TranscriptNotReady) => {
                AppError::TranscriptNotReady
            }
            PipelineError::Provider(e) => AppError::ProviderUnavailable(e.to_string()),
            PipelineError::Analysis(AnalysisError::Malformed(msg)) => {
                AppError::MalformedAnalysis(msg)
            }
            PipelineError::Analysis(AnalysisError::Backend(e)) => AppError::Llm(e.to_string()),
            PipelineError::Conflict(id) => {
                AppError::Conflict(format!("Interview {id} was modified concurrently"))
            }
            PipelineError::Store(StoreError::VersionConflict) => {
                AppError::Conflict("Concurrent modification".to_string())
            }
            PipelineError::Store(StoreError::Database(e)) => AppError::Database(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict => AppError::Conflict("Concurrent modification".to_string()),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::ProviderUnavailable(msg) => {
                tracing::warn!("Meeting provider error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_UNAVAILABLE",
                    "The meeting provider is unavailable; retry the operation".to_string(),
                )
            }
            // Transient by design: the recording exists but the provider
            // has not generated the transcript yet.
            AppError::TranscriptNotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "TRANSCRIPT_NOT_READY",
                "Transcript is not ready yet; retry later".to_string(),
            ),
            AppError::MalformedAnalysis(msg) => {
                tracing::error!("Malformed analysis response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_ANALYSIS_RESPONSE",
                    msg.clone(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: AppError = PipelineError::InterviewNotFound(Uuid::new_v4()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_transcript_not_ready_maps_to_retryable() {
        let err: AppError =
            PipelineError::Provider(MeetingError::TranscriptNotReady).into();
        assert!(matches!(err, AppError::TranscriptNotReady));
    }

    #[test]
    fn test_scheduling_failure_maps_to_provider_unavailable() {
        let err: AppError = PipelineError::SchedulingFailed(MeetingError::Unavailable(
            "timeout".to_string(),
        ))
        .into();
        assert!(matches!(err, AppError::ProviderUnavailable(_)));
    }

    #[test]
    fn test_malformed_analysis_is_surfaced_verbatim() {
        let err: AppError =
            PipelineError::Analysis(AnalysisError::Malformed("missing key".to_string())).into();
        match err {
            AppError::MalformedAnalysis(msg) => assert_eq!(msg, "missing key"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err: AppError = PipelineError::Conflict(Uuid::new_v4()).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
