use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::InterviewRow;
use crate::interview::pipeline::AnalysisOutcome;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewRequest {
    pub candidate_id: Uuid,
    pub recruiter_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
}

#[derive(Deserialize)]
pub struct AnalyzeInterviewRequest {
    pub questions: Vec<String>,
}

#[derive(Deserialize)]
pub struct InterviewListQuery {
    pub candidate_id: Option<Uuid>,
    pub recruiter_id: Option<Uuid>,
}

/// POST /api/v1/interviews
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    Json(req): Json<ScheduleInterviewRequest>,
) -> Result<Json<InterviewRow>, AppError> {
    let interview = state
        .pipeline
        .schedule_interview(
            req.candidate_id,
            req.recruiter_id,
            req.scheduled_time,
            req.duration_minutes,
        )
        .await?;
    Ok(Json(interview))
}

/// POST /api/v1/interviews/:id/complete
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewRow>, AppError> {
    let interview = state.pipeline.complete_interview(id).await?;
    Ok(Json(interview))
}

/// POST /api/v1/interviews/:id/analyze
pub async fn handle_analyze_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnalyzeInterviewRequest>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    if req.questions.is_empty() {
        return Err(AppError::Validation(
            "questions must not be empty".to_string(),
        ));
    }
    let outcome = state.pipeline.analyze_interview(id, &req.questions).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewRow>, AppError> {
    let interview = state
        .interviews
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;
    Ok(Json(interview))
}

/// GET /api/v1/interviews?candidate_id=... | ?recruiter_id=...
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(params): Query<InterviewListQuery>,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    let interviews = match (params.candidate_id, params.recruiter_id) {
        (Some(candidate_id), None) => state.interviews.list_for_candidate(candidate_id).await?,
        (None, Some(recruiter_id)) => state.interviews.list_for_recruiter(recruiter_id).await?,
        _ => {
            return Err(AppError::Validation(
                "provide exactly one of candidate_id or recruiter_id".to_string(),
            ))
        }
    };
    Ok(Json(interviews))
}
