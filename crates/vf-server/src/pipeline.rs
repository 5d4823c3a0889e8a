//! The per-upload transcode pipeline.
//!
//! Strictly sequential per upload: inspect → plan → build → execute →
//! assemble; no step begins before its predecessor succeeds. Pipelines for
//! different uploads run independently, with only the encode step bounded by
//! the context's semaphore. Any failure (or cancellation) discards the asset
//! directory, so a master playlist exists on disk only for assets whose
//! pipeline completed entirely.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use vf_core::{Error, Result};
use vf_hls::{ladder, manifest, AssetDir, EncodeJob, PublishedAsset};

use crate::context::AppContext;

/// Run the full pipeline for one saved upload, publishing an HLS asset.
pub async fn process_upload(
    ctx: &AppContext,
    source: &Path,
    cancel: CancellationToken,
) -> Result<PublishedAsset> {
    // Asset identity is allocated at admission; uniqueness of the directory
    // is the only synchronization concurrent pipelines need.
    let asset = ctx.store.allocate()?;
    let asset_id = asset.id();

    match run_stages(ctx, source, &asset, cancel).await {
        Ok(published) => {
            tracing::info!(asset_id = %asset_id, "Published HLS asset");
            Ok(published)
        }
        Err(e) => {
            tracing::warn!(asset_id = %asset_id, error = %e, "Pipeline failed; discarding asset");
            ctx.store.discard(asset_id);
            Err(e)
        }
    }
}

async fn run_stages(
    ctx: &AppContext,
    source: &Path,
    asset: &AssetDir,
    cancel: CancellationToken,
) -> Result<PublishedAsset> {
    let descriptor = vf_av::probe::inspect(&ctx.tools, source).await?;

    let plan = ladder::plan(&descriptor)?;

    let job = EncodeJob::build(source, &plan, asset.path(), &ctx.config.encode)?;

    // Hold an encode slot only for the duration of the external invocation;
    // probes of other uploads proceed while we wait.
    {
        let _permit = ctx
            .encode_slots
            .acquire()
            .await
            .map_err(|_| Error::Internal("encode semaphore closed".into()))?;
        vf_av::run_encode(&ctx.tools, &job, cancel).await?;
    }

    let master_path = manifest::write_master(&plan, asset.path())?;

    Ok(PublishedAsset {
        id: asset.id(),
        dir: asset.path().to_path_buf(),
        master_path,
        renditions: plan
            .renditions
            .iter()
            .map(|r| r.label.to_string())
            .collect(),
    })
}
