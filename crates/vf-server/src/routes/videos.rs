//! Published-asset listing route handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;

/// Listing of published assets.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VideoListResponse {
    /// Asset identifiers; each is a directory under the output root and the
    /// first path segment of its playback URL.
    pub videos: Vec<String>,
}

/// GET /api/videos
#[utoipa::path(
    get,
    path = "/api/videos",
    responses(
        (status = 200, description = "List published assets", body = VideoListResponse)
    )
)]
pub async fn list_videos(
    State(ctx): State<AppContext>,
) -> Result<Json<VideoListResponse>, AppError> {
    let ids = ctx.store.list()?;
    Ok(Json(VideoListResponse {
        videos: ids.iter().map(ToString::to_string).collect(),
    }))
}
