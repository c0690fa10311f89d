use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::assessment::{generate_sections, AssessmentRow};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub candidate_id: Uuid,
    /// Skills extracted by the resume pipeline upstream.
    pub skills: Vec<String>,
}

/// POST /api/v1/assessments
pub async fn handle_create_assessment(
    State(state): State<AppState>,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<Json<AssessmentRow>, AppError> {
    if req.skills.is_empty() {
        return Err(AppError::Validation("skills must not be empty".to_string()));
    }

    let sections = generate_sections(&req.skills);
    let sections_json = serde_json::to_value(&sections)
        .expect("AssessmentSection serialization is infallible");

    let assessment = AssessmentRow {
        id: Uuid::new_v4(),
        candidate_id: req.candidate_id,
        title: "Skill Assessment".to_string(),
        sections: sections_json,
        status: "CREATED".to_string(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO assessments (id, candidate_id, title, sections, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(assessment.id)
    .bind(assessment.candidate_id)
    .bind(&assessment.title)
    .bind(&assessment.sections)
    .bind(&assessment.status)
    .bind(assessment.created_at)
    .execute(&state.db)
    .await?;

    info!(
        "Created assessment {} for candidate {} ({} sections)",
        assessment.id,
        assessment.candidate_id,
        sections.len()
    );
    Ok(Json(assessment))
}
