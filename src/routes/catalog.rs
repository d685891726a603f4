use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::models::catalog::{Avatar, Pagination, Voice};
use crate::routes::error::AppResult;
use crate::services::pagination::{paginate, parse_page};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarPage {
    pub avatars: Vec<Avatar>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoicePage {
    pub voices: Vec<Voice>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: T,
}

/// GET /api/list-avatars?page= — one page of the avatar catalog.
pub async fn list_avatars(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Listing<AvatarPage>>> {
    let avatars = state.heygen.list_avatars().await?;
    let page = paginate(&avatars, parse_page(query.page.as_deref()), state.page_size);

    Ok(Json(Listing {
        data: AvatarPage {
            avatars: page.items,
            pagination: page.pagination,
        },
    }))
}

/// GET /api/list-voices?page= — one page of the voice catalog.
pub async fn list_voices(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Listing<VoicePage>>> {
    let voices = state.heygen.list_voices().await?;
    let page = paginate(&voices, parse_page(query.page.as_deref()), state.page_size);

    Ok(Json(Listing {
        data: VoicePage {
            voices: page.items,
            pagination: page.pagination,
        },
    }))
}
