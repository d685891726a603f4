use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::models::catalog::StreamingToken;
use crate::routes::error::AppResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub data: StreamingToken,
}

/// POST /api/create-token — mint a token for the live avatar client.
pub async fn create_token(State(state): State<AppState>) -> AppResult<Json<TokenResponse>> {
    let token = state.heygen.create_streaming_token().await?;
    tracing::debug!("Streaming token issued");
    Ok(Json(TokenResponse { data: token }))
}
