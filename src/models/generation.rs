use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::background::{validate_background, BackgroundSpec, UpstreamBackground};
use crate::models::null_as_default;

/// Request to render a talking-avatar video from a script.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[garde(custom(required))]
    pub script: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[garde(custom(required))]
    pub avatar_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[garde(custom(required))]
    pub voice_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[garde(custom(validate_background))]
    pub background: BackgroundSpec,
}

fn required(value: &str, _: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("is required"));
    }
    Ok(())
}

impl GenerationRequest {
    pub fn new(
        script: impl Into<String>,
        avatar_id: impl Into<String>,
        voice_id: impl Into<String>,
    ) -> Self {
        Self {
            script: script.into(),
            avatar_id: avatar_id.into(),
            voice_id: voice_id.into(),
            background: BackgroundSpec::default(),
        }
    }

    pub fn with_background(mut self, background: BackgroundSpec) -> Self {
        self.background = background;
        self
    }
}

/// Identifier the remote service assigns to a submitted render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output frame size.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimension {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Body of the remote generate call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateVideoPayload {
    pub video_inputs: Vec<VideoInput>,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoInput {
    pub character: Character,
    pub voice: VoiceInput,
    pub background: UpstreamBackground,
}

#[derive(Debug, Clone, Serialize)]
pub struct Character {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub avatar_id: String,
    pub avatar_style: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceInput {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub input_text: String,
    pub voice_id: String,
}

impl GenerateVideoPayload {
    /// Single-scene payload for one avatar speaking `request.script`.
    pub fn from_request(request: &GenerationRequest, dimension: Dimension) -> Self {
        Self {
            video_inputs: vec![VideoInput {
                character: Character {
                    kind: "avatar",
                    avatar_id: request.avatar_id.clone(),
                    avatar_style: "normal",
                },
                voice: VoiceInput {
                    kind: "text",
                    input_text: request.script.clone(),
                    voice_id: request.voice_id.clone(),
                },
                background: request.background.normalize(),
            }],
            dimension,
        }
    }
}

/// Response returned to browser callers after a successful submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub data: SubmittedJob,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmittedJob {
    pub video_id: JobId,
}
