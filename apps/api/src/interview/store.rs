//! Interview record store — the only shared mutable resource in the
//! pipeline. Updates are compare-and-set on the row's `version` so two
//! concurrent writers for the same interview id cannot lose an update;
//! callers re-read and retry on `VersionConflict`.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::interview::models::InterviewRow;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The row changed since it was read; re-read before retrying.
    #[error("interview was modified by a concurrent writer")]
    VersionConflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn insert(&self, interview: &InterviewRow) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRow>, StoreError>;

    /// Version-checked write. Persists `interview` only if the stored row
    /// still carries `interview.version`, bumping the version on success.
    async fn update(&self, interview: &InterviewRow) -> Result<InterviewRow, StoreError>;

    async fn list_for_candidate(&self, candidate_id: Uuid)
        -> Result<Vec<InterviewRow>, StoreError>;

    async fn list_for_recruiter(&self, recruiter_id: Uuid)
        -> Result<Vec<InterviewRow>, StoreError>;
}

pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn insert(&self, interview: &InterviewRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO interviews
                (id, candidate_id, recruiter_id, scheduled_time, duration_minutes,
                 meeting_id, recording_id, transcript, question_scores, overall_score,
                 decision, recording_processed, analyzed, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(interview.id)
        .bind(interview.candidate_id)
        .bind(interview.recruiter_id)
        .bind(interview.scheduled_time)
        .bind(interview.duration_minutes)
        .bind(&interview.meeting_id)
        .bind(&interview.recording_id)
        .bind(&interview.transcript)
        .bind(&interview.question_scores)
        .bind(interview.overall_score)
        .bind(&interview.decision)
        .bind(interview.recording_processed)
        .bind(interview.analyzed)
        .bind(interview.version)
        .bind(interview.created_at)
        .bind(interview.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update(&self, interview: &InterviewRow) -> Result<InterviewRow, StoreError> {
        let updated = sqlx::query_as::<_, InterviewRow>(
            r#"
            UPDATE interviews SET
                recording_id = $3,
                transcript = $4,
                question_scores = $5,
                overall_score = $6,
                decision = $7,
                recording_processed = $8,
                analyzed = $9,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(interview.id)
        .bind(interview.version)
        .bind(&interview.recording_id)
        .bind(&interview.transcript)
        .bind(&interview.question_scores)
        .bind(interview.overall_score)
        .bind(&interview.decision)
        .bind(interview.recording_processed)
        .bind(interview.analyzed)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(StoreError::VersionConflict)
    }

    async fn list_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<InterviewRow>, StoreError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE candidate_id = $1 ORDER BY scheduled_time DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_for_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<InterviewRow>, StoreError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE recruiter_id = $1 ORDER BY scheduled_time DESC",
        )
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// In-memory store with the same compare-and-set semantics as the
/// Postgres store, used by pipeline tests.
#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryInterviewStore {
        rows: Mutex<HashMap<Uuid, InterviewRow>>,
    }

    #[async_trait]
    impl InterviewStore for InMemoryInterviewStore {
        async fn insert(&self, interview: &InterviewRow) -> Result<(), StoreError> {
            self.rows
                .lock()
                .unwrap()
                .insert(interview.id, interview.clone());
            Ok(())
        }

        async fn get(&self, id: Uuid) -> Result<Option<InterviewRow>, StoreError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn update(&self, interview: &InterviewRow) -> Result<InterviewRow, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let existing = rows
                .get(&interview.id)
                .ok_or(StoreError::VersionConflict)?;
            if existing.version != interview.version {
                return Err(StoreError::VersionConflict);
            }
            let mut updated = interview.clone();
            updated.version += 1;
            updated.updated_at = chrono::Utc::now();
            rows.insert(updated.id, updated.clone());
            Ok(updated)
        }

        async fn list_for_candidate(
            &self,
            candidate_id: Uuid,
        ) -> Result<Vec<InterviewRow>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.candidate_id == candidate_id)
                .cloned()
                .collect())
        }

        async fn list_for_recruiter(
            &self,
            recruiter_id: Uuid,
        ) -> Result<Vec<InterviewRow>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.recruiter_id == recruiter_id)
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::memory::InMemoryInterviewStore;
    use super::*;

    fn make_row() -> InterviewRow {
        let now = Utc::now();
        InterviewRow {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            recruiter_id: Uuid::new_v4(),
            scheduled_time: now,
            duration_minutes: 60,
            meeting_id: "zoom-123".to_string(),
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
        }
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store = InMemoryInterviewStore::default();
        let row = make_row();
        store.insert(&row).await.unwrap();

        let mut change = row.clone();
        change.recording_processed = true;
        let updated = store.update(&change).await.unwrap();
        assert_eq!(updated.version, 1);
        assert!(updated.recording_processed);
    }

    #[tokio::test]
    async fn test_stale_write_conflicts() {
        let store = InMemoryInterviewStore::default();
        let row = make_row();
        store.insert(&row).await.unwrap();

        // First writer wins.
        let mut first = row.clone();
        first.recording_id = Some("rec-1".to_string());
        store.update(&first).await.unwrap();

        // Second writer still holds the old snapshot: must conflict,
        // not overwrite.
        let mut second = row.clone();
        second.transcript = Some("lost?".to_string());
        let err = store.update(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict));

        let current = store.get(row.id).await.unwrap().unwrap();
        assert_eq!(current.recording_id.as_deref(), Some("rec-1"));
        assert!(current.transcript.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_row_conflicts() {
        let store = InMemoryInterviewStore::default();
        let err = store.update(&make_row()).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict));
    }
}
