//! Zoom implementation of `MeetingProvider`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::meeting::{
    MeetingError, MeetingHandle, MeetingProvider, RecordingManifest, Transcript,
};

const ZOOM_API_URL: &str = "https://api.zoom.us/v2";
/// Zoom meeting type 2 = scheduled meeting.
const SCHEDULED_MEETING: u8 = 2;

#[derive(Debug, Serialize)]
struct CreateMeetingRequest<'a> {
    topic: &'a str,
    #[serde(rename = "type")]
    meeting_type: u8,
    start_time: String,
    duration: i32,
    agenda: &'a str,
    settings: MeetingSettings,
}

/// Recording must land in Zoom cloud so the manifest and transcript
/// endpoints have something to serve.
#[derive(Debug, Serialize)]
struct MeetingSettings {
    host_video: bool,
    participant_video: bool,
    join_before_host: bool,
    mute_upon_entry: bool,
    auto_recording: &'static str,
    waiting_room: bool,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            host_video: true,
            participant_video: true,
            join_before_host: false,
            mute_upon_entry: false,
            auto_recording: "cloud",
            waiting_room: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateMeetingResponse {
    id: u64,
}

pub struct ZoomClient {
    client: Client,
    api_token: String,
}

impl ZoomClient {
    pub fn new(api_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_token,
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, MeetingError> {
        self.client
            .get(format!("{ZOOM_API_URL}{path}"))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| MeetingError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl MeetingProvider for ZoomClient {
    async fn create_meeting(
        &self,
        topic: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        agenda: &str,
    ) -> Result<MeetingHandle, MeetingError> {
        let body = CreateMeetingRequest {
            topic,
            meeting_type: SCHEDULED_MEETING,
            start_time: start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            duration: duration_minutes,
            agenda,
            settings: MeetingSettings::default(),
        };

        let response = self
            .client
            .post(format!("{ZOOM_API_URL}/users/me/meetings"))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MeetingError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Zoom create meeting returned {status}: {body}");
            return Err(MeetingError::Unavailable(format!("status {status}")));
        }

        let meeting: CreateMeetingResponse = response
            .json()
            .await
            .map_err(|e| MeetingError::Unavailable(e.to_string()))?;

        debug!("Created Zoom meeting {}", meeting.id);
        Ok(MeetingHandle {
            id: meeting.id.to_string(),
        })
    }

    async fn get_recording(&self, meeting_id: &str) -> Result<RecordingManifest, MeetingError> {
        let response = self.get(&format!("/meetings/{meeting_id}/recordings")).await?;

        // Zoom returns 404 while cloud recording is still processing.
        // Model that as an empty manifest, not a failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RecordingManifest::default());
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Zoom get recording returned {status}: {body}");
            return Err(MeetingError::Unavailable(format!("status {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| MeetingError::Unavailable(e.to_string()))
    }

    async fn get_transcript(&self, recording_id: &str) -> Result<Transcript, MeetingError> {
        let response = self
            .get(&format!("/meetings/recordings/{recording_id}/transcript"))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MeetingError::TranscriptNotReady);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Zoom get transcript returned {status}: {body}");
            return Err(MeetingError::Unavailable(format!("status {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| MeetingError::Unavailable(e.to_string()))
    }
}
