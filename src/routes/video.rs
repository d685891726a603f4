use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::app_state::AppState;
use crate::models::generation::{GenerationRequest, JobId, SubmitResponse, SubmittedJob};
use crate::routes::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CheckStatusQuery {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// POST /api/generate-video — submit a script for rendering.
pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> AppResult<Json<SubmitResponse>> {
    let Json(request) = payload?;
    let video_id = state.gateway.submit(&request).await?;

    Ok(Json(SubmitResponse {
        data: SubmittedJob { video_id },
    }))
}

/// GET /api/check-status?videoId= — pass the remote status response through.
pub async fn check_status(
    State(state): State<AppState>,
    Query(query): Query<CheckStatusQuery>,
) -> AppResult<Json<Value>> {
    let video_id = query
        .video_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Video ID is required".to_string()))?;

    let status = state.heygen.video_status_raw(&JobId::new(video_id)).await?;
    Ok(Json(status))
}
