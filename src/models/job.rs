use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Envelope code the remote status endpoint uses for success.
pub const STATUS_SUCCESS_CODE: i64 = 100;

/// Status of a remote video render. Owned by the remote service; only observed here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Waiting,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Error object the remote service may embed in a status snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl EmbeddedError {
    /// Text to show: `detail` when non-empty, else `message`.
    pub fn text(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}

/// `data` object of a status response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub gif_url: Option<String>,
    #[serde(default)]
    pub caption_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error: Option<EmbeddedError>,
}

impl StatusSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            id: None,
            status,
            video_url: None,
            thumbnail_url: None,
            gif_url: None,
            caption_url: None,
            duration: None,
            error: None,
        }
    }

    /// Video URL, ignoring empty strings.
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Outer envelope of a status response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<StatusSnapshot>,
}

impl StatusEnvelope {
    pub fn success(data: StatusSnapshot) -> Self {
        Self {
            code: STATUS_SUCCESS_CODE,
            message: Some("Success".to_string()),
            data: Some(data),
        }
    }

    /// Snapshot when the envelope signals success.
    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        if self.code == STATUS_SUCCESS_CODE {
            self.data.as_ref()
        } else {
            None
        }
    }
}
