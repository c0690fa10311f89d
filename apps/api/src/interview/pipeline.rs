//! Interview pipeline — sequences scheduling, recording retrieval,
//! transcription, and analysis, persisting state at each step.
//!
//! Every stage is an explicit awaitable operation invoked by an external
//! trigger; nothing runs fire-and-forget. External call failures are
//! caught at the boundary and surfaced as typed errors — the pipeline
//! never retries a failed provider call internally. The one internal
//! retry is the compare-and-set loop on the record store, which re-reads
//! before every attempt so concurrent writers cannot lose updates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::analyzer::{self, AnalysisError};
use crate::interview::decision::decision_for;
use crate::interview::models::{Decision, InterviewRow, QuestionScore};
use crate::interview::store::{InterviewStore, StoreError};
use crate::llm_client::CompletionBackend;
use crate::meeting::{MeetingError, MeetingProvider};

const MEETING_TOPIC: &str = "Interview with Candidate";
const MEETING_AGENDA: &str = "Hireflow Interview Session";
const DEFAULT_DURATION_MINUTES: i32 = 60;
/// Attempts for the read-modify-write loop before surfacing a conflict.
const MAX_CAS_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("interview {0} not found")]
    InterviewNotFound(Uuid),

    #[error("interview {0} was not scheduled through this pipeline (no meeting id)")]
    MissingMeetingId(Uuid),

    #[error("interview {0} has no transcript yet")]
    TranscriptMissing(Uuid),

    #[error("failed to schedule interview: {0}")]
    SchedulingFailed(#[source] MeetingError),

    #[error("meeting provider error: {0}")]
    Provider(#[from] MeetingError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("interview {0} kept changing under concurrent writers")]
    Conflict(Uuid),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of a completed analysis run, returned to the API layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub question_scores: Vec<QuestionScore>,
    pub overall_score: u8,
    pub overall_feedback: String,
    pub decision: Decision,
}

/// Orchestrates the interview lifecycle over injected capabilities.
pub struct InterviewPipeline {
    store: Arc<dyn InterviewStore>,
    meetings: Arc<dyn MeetingProvider>,
    llm: Arc<dyn CompletionBackend>,
}

impl InterviewPipeline {
    pub fn new(
        store: Arc<dyn InterviewStore>,
        meetings: Arc<dyn MeetingProvider>,
        llm: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            store,
            meetings,
            llm,
        }
    }

    /// Creates the provider meeting and persists a new interview record.
    /// On provider failure nothing is persisted.
    pub async fn schedule_interview(
        &self,
        candidate_id: Uuid,
        recruiter_id: Uuid,
        scheduled_time: DateTime<Utc>,
        duration_minutes: Option<i32>,
    ) -> Result<InterviewRow, PipelineError> {
        let duration = duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);

        let meeting = self
            .meetings
            .create_meeting(MEETING_TOPIC, scheduled_time, duration, MEETING_AGENDA)
            .await
            .map_err(PipelineError::SchedulingFailed)?;

        let now = Utc::now();
        let interview = InterviewRow {
            id: Uuid::new_v4(),
            candidate_id,
            recruiter_id,
            scheduled_time,
            duration_minutes: duration,
            meeting_id: meeting.id,
            recording_id: None,
            transcript: None,
            question_scores: None,
            overall_score: None,
            decision: None,
            recording_processed: false,
            analyzed: false,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&interview).await?;

        info!(
            "Scheduled interview {} for candidate {} (meeting {})",
            interview.id, candidate_id, interview.meeting_id
        );
        Ok(interview)
    }

    /// Fetches the recording manifest and, when a usable media file
    /// exists, persists the recording id and transcript.
    ///
    /// An empty manifest is not an error: provider-side recording
    /// processing lags meeting completion, so the call returns the
    /// unchanged row and the caller retries later. The recording id is
    /// persisted before the transcript fetch, so a `TranscriptNotReady`
    /// failure keeps the recording progress.
    pub async fn complete_interview(&self, id: Uuid) -> Result<InterviewRow, PipelineError> {
        let interview = self
            .store
            .get(id)
            .await?
            .ok_or(PipelineError::InterviewNotFound(id))?;

        if interview.meeting_id.trim().is_empty() {
            return Err(PipelineError::MissingMeetingId(id));
        }

        let manifest = self.meetings.get_recording(&interview.meeting_id).await?;
        let Some(file) = manifest.audio_video_file() else {
            info!("Recording for interview {id} not available yet");
            return Ok(interview);
        };
        let recording_id = file.id.clone();

        self.write_with_retry(id, |row| {
            row.recording_id = Some(recording_id.clone());
            row.recording_processed = true;
        })
        .await?;
        info!("Interview {id}: recording {recording_id} confirmed");

        let transcript = self.meetings.get_transcript(&recording_id).await?;

        let updated = self
            .write_with_retry(id, |row| {
                row.transcript = Some(transcript.transcript_text.clone());
            })
            .await?;
        info!("Interview {id}: transcript persisted");

        Ok(updated)
    }

    /// Scores the persisted transcript against the rubric questions and
    /// persists the outcome. Idempotent at the data level: re-running
    /// overwrites prior scores rather than appending, and a malformed
    /// model response leaves prior persisted scores untouched.
    pub async fn analyze_interview(
        &self,
        id: Uuid,
        questions: &[String],
    ) -> Result<AnalysisOutcome, PipelineError> {
        let interview = self
            .store
            .get(id)
            .await?
            .ok_or(PipelineError::InterviewNotFound(id))?;

        let transcript = interview
            .transcript
            .ok_or(PipelineError::TranscriptMissing(id))?;

        let analysis = analyzer::analyze(&transcript, questions, self.llm.as_ref()).await?;
        let decision = decision_for(analysis.overall);

        let scores_json = serde_json::to_value(&analysis.question_scores)
            .expect("QuestionScore serialization is infallible");
        let overall = analysis.overall.get();

        self.write_with_retry(id, |row| {
            row.question_scores = Some(scores_json.clone());
            row.overall_score = Some(overall as i16);
            row.decision = Some(decision.as_str().to_string());
            row.analyzed = true;
        })
        .await?;

        info!(
            "Interview {id} analyzed: overall {} -> {}",
            overall,
            decision.as_str()
        );

        Ok(AnalysisOutcome {
            question_scores: analysis.question_scores,
            overall_score: overall,
            overall_feedback: analysis.overall_feedback,
            decision,
        })
    }

    /// Read-modify-write with optimistic concurrency: re-reads the row,
    /// applies the mutation, and retries on version conflict so the last
    /// write always reflects a causally later read.
    async fn write_with_retry<F>(&self, id: Uuid, mut apply: F) -> Result<InterviewRow, PipelineError>
    where
        F: FnMut(&mut InterviewRow),
    {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let mut row = self
                .store
                .get(id)
                .await?
                .ok_or(PipelineError::InterviewNotFound(id))?;
            apply(&mut row);

            match self.store.update(&row).await {
                Ok(updated) => return Ok(updated),
                Err(StoreError::VersionConflict) => {
                    debug!("Interview {id}: write conflict on attempt {attempt}, re-reading");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(PipelineError::Conflict(id))
    }
}
