use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

/// Avatar offered by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Avatar {
    pub avatar_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub preview_video_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub premium: bool,
}

/// Voice offered by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Voice {
    pub voice_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub preview_audio: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub support_pause: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emotion_support: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub support_locale: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvatarListData {
    #[serde(default)]
    pub avatars: Vec<Avatar>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoiceListData {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

/// Short-lived credential for the live streaming client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamingToken {
    pub token: String,
}

/// Position of a page within a locally paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
