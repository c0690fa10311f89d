//! Meeting provider — capability interface over the video-conferencing
//! backend (meeting creation, recording manifests, transcripts).
//!
//! Carried in `AppState` as `Arc<dyn MeetingProvider>` so the interview
//! pipeline can be tested against fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod zoom;

#[derive(Debug, Error)]
pub enum MeetingError {
    /// Backend unreachable, erroring, or timing out. Recoverable by the
    /// caller re-invoking the parent operation; never retried internally.
    #[error("meeting provider unavailable: {0}")]
    Unavailable(String),

    /// Recording exists but the transcript has not been generated yet.
    /// An expected transient condition, not an error-level failure.
    #[error("transcript not ready for recording")]
    TranscriptNotReady,
}

/// Handle to a meeting created at the provider.
#[derive(Debug, Clone)]
pub struct MeetingHandle {
    pub id: String,
}

/// One media file the provider reports for a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingFile {
    pub id: String,
    pub file_type: String,
}

/// The set of media files available for a meeting. Empty while the
/// provider is still processing the recording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingManifest {
    #[serde(default)]
    pub recording_files: Vec<RecordingFile>,
}

impl RecordingManifest {
    /// Selects the first audio/video asset usable for transcription.
    /// Zoom labels these M4A (audio-only) or MP4 (full video).
    pub fn audio_video_file(&self) -> Option<&RecordingFile> {
        self.recording_files
            .iter()
            .find(|f| matches!(f.file_type.to_ascii_uppercase().as_str(), "M4A" | "MP4"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    pub transcript_text: String,
}

#[async_trait]
pub trait MeetingProvider: Send + Sync {
    /// Creates a scheduled meeting with cloud recording enabled.
    async fn create_meeting(
        &self,
        topic: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        agenda: &str,
    ) -> Result<MeetingHandle, MeetingError>;

    /// Fetches the recording manifest for a meeting. An empty manifest
    /// means the recording is not available yet — not an error.
    async fn get_recording(&self, meeting_id: &str) -> Result<RecordingManifest, MeetingError>;

    /// Fetches the transcript for a recording.
    async fn get_transcript(&self, recording_id: &str) -> Result<Transcript, MeetingError>;
}
