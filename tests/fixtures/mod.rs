//! Generation requests exercised by the live end-to-end suite.

#![allow(dead_code)]

use serde_json::{json, Value};

/// A request body paired with what we expect the server to do with it.
#[derive(Debug, Clone)]
pub struct GenerationFixture {
    pub name: &'static str,
    pub background: Option<&'static str>,
    pub should_submit: bool,
    pub description: &'static str,
}

/// Avatar and voice ids are read from the environment so the suite can run
/// against any account; these are HeyGen's public stock ids.
pub fn avatar_id() -> String {
    std::env::var("E2E_AVATAR_ID").unwrap_or_else(|_| "Daisy-inskirt-20220818".to_string())
}

pub fn voice_id() -> String {
    std::env::var("E2E_VOICE_ID").unwrap_or_else(|_| "2d5b0e6cf36f460aa7fc47e3eee4ba54".to_string())
}

pub const GENERATION_FIXTURES: &[GenerationFixture] = &[
    GenerationFixture {
        name: "default_color",
        background: None,
        should_submit: true,
        description: "No background, server fills in the default color",
    },
    GenerationFixture {
        name: "explicit_color",
        background: Some(r##"{"type": "color", "value": "#1d1d1f"}"##),
        should_submit: true,
        description: "Dark solid color",
    },
    GenerationFixture {
        name: "image_background",
        background: Some(r#"{"type": "image", "url": "https://images.unsplash.com/photo-1497366216548-37526070297c", "fit": "cover"}"#),
        should_submit: true,
        description: "Office photo behind the avatar",
    },
    GenerationFixture {
        name: "image_without_url",
        background: Some(r#"{"type": "image", "url": ""}"#),
        should_submit: false,
        description: "Rejected locally before any upstream call",
    },
];

impl GenerationFixture {
    pub fn body(&self, script: &str) -> Value {
        let mut body = json!({
            "script": script,
            "avatar_id": avatar_id(),
            "voice_id": voice_id(),
        });
        if let Some(background) = self.background {
            body["background"] =
                serde_json::from_str(background).expect("fixture background is valid JSON");
        }
        body
    }
}
