use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::models::catalog::{Avatar, AvatarListData, StreamingToken, Voice, VoiceListData};
use crate::models::generation::{GenerateVideoPayload, JobId};
use crate::models::job::StatusEnvelope;
use crate::services::poller::StatusSource;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Characters of a non-JSON body kept in error messages.
const BODY_SNIPPET_LEN: usize = 200;

/// Client for the remote talking-avatar video service.
pub struct HeyGenClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct GenerateData {
    video_id: Option<String>,
}

impl HeyGenClient {
    pub fn new(config: &AppConfig) -> Result<Self, HeyGenError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.heygen_api_base.trim_end_matches('/').to_string(),
            api_key: config.heygen_api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit a render and return the identifier the service assigned to it.
    pub async fn generate_video(&self, payload: &GenerateVideoPayload) -> Result<JobId, HeyGenError> {
        let started = Instant::now();
        let response = self
            .http
            .post(self.url("/v2/video/generate"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(payload)
            .send()
            .await;
        record_latency("generate", started);

        let body: DataEnvelope<GenerateData> = read_json(response?).await?;
        body.data
            .and_then(|d| d.video_id)
            .filter(|id| !id.is_empty())
            .map(JobId::new)
            .ok_or_else(|| HeyGenError::Upstream {
                status_code: StatusCode::OK.as_u16(),
                message: "No video_id returned".to_string(),
            })
    }

    async fn query_status(&self, job_id: &JobId) -> Result<Response, HeyGenError> {
        let started = Instant::now();
        let response = self
            .http
            .get(self.url("/v1/video_status.get"))
            .query(&[("video_id", job_id.as_str())])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;
        record_latency("video_status", started);
        Ok(response?)
    }

    /// Status response for a job, as the remote service returned it.
    pub async fn video_status_raw(&self, job_id: &JobId) -> Result<Value, HeyGenError> {
        read_json(self.query_status(job_id).await?).await
    }

    /// Typed status for a job. An error status that still carries a status
    /// envelope is returned as that envelope so its code can be inspected.
    pub async fn video_status(&self, job_id: &JobId) -> Result<StatusEnvelope, HeyGenError> {
        let body = read_body(self.query_status(job_id).await?).await?;

        if !body.status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<StatusEnvelope>(&body.text) {
                tracing::warn!(
                    job_id = %job_id,
                    status = body.status.as_u16(),
                    code = envelope.code,
                    "Status query answered with an error envelope"
                );
                return Ok(envelope);
            }
        }

        decode_json(body)
    }

    /// Mint a session token for the live streaming client.
    pub async fn create_streaming_token(&self) -> Result<StreamingToken, HeyGenError> {
        let started = Instant::now();
        let response = self
            .http
            .post(self.url("/v1/streaming.create_token"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;
        record_latency("create_token", started);

        let body: DataEnvelope<StreamingToken> = read_json(response?).await?;
        body.data.ok_or_else(|| HeyGenError::Upstream {
            status_code: StatusCode::OK.as_u16(),
            message: "No token returned".to_string(),
        })
    }

    pub async fn list_avatars(&self) -> Result<Vec<Avatar>, HeyGenError> {
        let started = Instant::now();
        let response = self
            .http
            .get(self.url("/v2/avatars"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;
        record_latency("list_avatars", started);

        let body: DataEnvelope<AvatarListData> = read_json(response?).await?;
        Ok(body.data.map(|d| d.avatars).unwrap_or_default())
    }

    pub async fn list_voices(&self) -> Result<Vec<Voice>, HeyGenError> {
        let started = Instant::now();
        let response = self
            .http
            .get(self.url("/v2/voices"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;
        record_latency("list_voices", started);

        let body: DataEnvelope<VoiceListData> = read_json(response?).await?;
        Ok(body.data.map(|d| d.voices).unwrap_or_default())
    }

    /// Reachability check: any HTTP answer from the base URL counts.
    pub async fn ping(&self) -> Result<(), HeyGenError> {
        self.http.get(&self.base_url).send().await?;
        Ok(())
    }
}

#[async_trait]
impl StatusSource for HeyGenClient {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusEnvelope, HeyGenError> {
        self.video_status(job_id).await
    }
}

fn record_latency(endpoint: &'static str, started: Instant) {
    metrics::histogram!("upstream_request_seconds", "endpoint" => endpoint)
        .record(started.elapsed().as_secs_f64());
}

struct RawBody {
    status: StatusCode,
    is_json: bool,
    text: String,
}

async fn read_body(response: Response) -> Result<RawBody, HeyGenError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let text = response.text().await?;

    Ok(RawBody {
        status,
        is_json,
        text,
    })
}

/// Read a JSON body, turning error statuses and non-JSON bodies into
/// `HeyGenError::Upstream`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, HeyGenError> {
    decode_json(read_body(response).await?)
}

fn decode_json<T: DeserializeOwned>(body: RawBody) -> Result<T, HeyGenError> {
    let RawBody {
        status,
        is_json,
        text,
    } = body;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), body = %snippet(&text), "Upstream returned an error");
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| upstream_message(&body))
            .unwrap_or_else(|| format!("API responded with status {}", status.as_u16()));
        return Err(HeyGenError::Upstream {
            status_code: status.as_u16(),
            message,
        });
    }

    if !is_json {
        tracing::warn!(body = %snippet(&text), "Upstream returned a non-JSON body");
        return Err(HeyGenError::Upstream {
            status_code: status.as_u16(),
            message: format!("Invalid response from HeyGen API: {}", snippet(&text)),
        });
    }

    Ok(serde_json::from_str(&text)?)
}

/// Message from an upstream error body: `message`, `error.message`, or a string `error`.
fn upstream_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/error/message").and_then(Value::as_str))
        .or_else(|| body.get("error").and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HeyGenError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream error ({status_code}): {message}")]
    Upstream { status_code: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HeyGenError {
    /// Local network or parsing failure, independent of what the service answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, HeyGenError::Http(_) | HeyGenError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_message_sources() {
        assert_eq!(
            upstream_message(&json!({"message": "quota exceeded"})).as_deref(),
            Some("quota exceeded")
        );
        assert_eq!(
            upstream_message(&json!({"error": {"code": "invalid_parameter", "message": "bad avatar"}}))
                .as_deref(),
            Some("bad avatar")
        );
        assert_eq!(
            upstream_message(&json!({"error": "Unauthorized"})).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(upstream_message(&json!({"error": null})), None);
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        assert_eq!(snippet(&long).chars().count(), BODY_SNIPPET_LEN);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = AppConfig::new("key", "http://localhost:9999/");
        let client = HeyGenClient::new(&config).unwrap();
        assert_eq!(client.url("/v2/voices"), "http://localhost:9999/v2/voices");
    }

    #[test]
    fn test_transport_classification() {
        let decode = HeyGenError::Decode(serde_json::from_str::<Value>("{").unwrap_err());
        assert!(decode.is_transport());
        let upstream = HeyGenError::Upstream {
            status_code: 500,
            message: "boom".to_string(),
        };
        assert!(!upstream.is_transport());
    }
}
