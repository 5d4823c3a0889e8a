//! Upload intake route handlers.
//!
//! The HTTP layer's only job is to land the multipart body on disk and hand
//! the saved path to the pipeline; every decision after that lives in the
//! pipeline and the crates below it.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use vf_core::{Error, UploadId};

use crate::context::AppContext;
use crate::error::AppError;
use crate::pipeline;

/// Multipart field name carrying the video file.
const UPLOAD_FIELD: &str = "video";

/// Response for a successfully published upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Stable asset identifier.
    pub asset_id: String,
    /// Playback entry point, relative to this server.
    pub master_url: String,
    /// Rendition labels that were produced, highest quality first.
    pub renditions: Vec<String>,
}

/// POST /api/upload
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 201, description = "Video transcoded and published", body = UploadResponse),
        (status = 400, description = "No video file in the request"),
        (status = 422, description = "Source cannot be transcoded (probe, resolution, or audio)"),
        (status = 502, description = "External encoder failed")
    )
)]
pub async fn upload_video(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut source: Option<PathBuf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("failed to read upload body: {e}")))?;

        source = Some(save_upload(&ctx, &original_name, &data).await?);
        break;
    }

    let source = source.ok_or(Error::MissingUpload)?;

    let published = pipeline::process_upload(&ctx, &source, ctx.shutdown.child_token()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            asset_id: published.id.to_string(),
            master_url: format!("/hls/{}/master.m3u8", published.id),
            renditions: published.renditions,
        }),
    ))
}

/// Save the upload body under a unique name, keeping the original extension
/// so the prober sees the container hint the client gave us.
async fn save_upload(
    ctx: &AppContext,
    original_name: &str,
    data: &[u8],
) -> Result<PathBuf, Error> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let path = ctx
        .config
        .storage
        .upload_dir
        .join(format!("upload-{}{ext}", UploadId::new()));

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| Error::write(&path, e))?;

    tracing::info!(
        path = %path.display(),
        bytes = data.len(),
        original = original_name,
        "Saved upload"
    );

    Ok(path)
}
