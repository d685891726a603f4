use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Color used when a color background omits its value.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f6f6fc";

/// How an image or video backdrop is scaled into the frame.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Fit {
    #[default]
    Cover,
    Crop,
    Contain,
    None,
}

/// Playback behavior of a video backdrop relative to the scene length.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlayStyle {
    FitToScene,
    Freeze,
    #[default]
    Loop,
    Once,
}

/// Backdrop requested by the caller. Optional fields fall back to defaults
/// when the request is normalized for the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundSpec {
    Color {
        #[serde(default)]
        value: Option<String>,
    },
    Image {
        #[serde(default)]
        url: String,
        #[serde(default)]
        fit: Option<Fit>,
    },
    Video {
        #[serde(default)]
        url: String,
        #[serde(default)]
        play_style: Option<PlayStyle>,
        #[serde(default)]
        fit: Option<Fit>,
    },
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        BackgroundSpec::Color { value: None }
    }
}

/// Backdrop exactly as the remote service expects it. Each variant carries
/// only its own fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpstreamBackground {
    Color { value: String },
    Image { url: String, fit: Fit },
    Video { url: String, play_style: PlayStyle, fit: Fit },
}

impl BackgroundSpec {
    /// Media URL for image and video backdrops.
    pub fn url(&self) -> Option<&str> {
        match self {
            BackgroundSpec::Color { .. } => None,
            BackgroundSpec::Image { url, .. } | BackgroundSpec::Video { url, .. } => Some(url),
        }
    }

    pub fn normalize(&self) -> UpstreamBackground {
        match self {
            BackgroundSpec::Color { value } => UpstreamBackground::Color {
                value: value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .unwrap_or(DEFAULT_BACKGROUND_COLOR)
                    .to_string(),
            },
            BackgroundSpec::Image { url, fit } => UpstreamBackground::Image {
                url: url.clone(),
                fit: fit.unwrap_or_default(),
            },
            BackgroundSpec::Video {
                url,
                play_style,
                fit,
            } => UpstreamBackground::Video {
                url: url.clone(),
                play_style: play_style.unwrap_or_default(),
                fit: fit.unwrap_or_default(),
            },
        }
    }
}

/// garde rule: image and video backdrops need a media URL.
pub fn validate_background(background: &BackgroundSpec, _: &()) -> garde::Result {
    match background.url() {
        Some(url) if url.trim().is_empty() => Err(garde::Error::new(
            "url is required for image and video backgrounds",
        )),
        _ => Ok(()),
    }
}
