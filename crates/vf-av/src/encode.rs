//! ffmpeg-backed encode execution.
//!
//! One invocation per upload: the built [`EncodeJob`] already carries the
//! complete fan-out argument list, so this module only runs it, maps
//! failures into [`vf_core::Error::Encode`] with the captured diagnostics,
//! and re-validates the produced artifacts. Failed encodes are never
//! retried; the caller decides what to do with the upload.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use vf_core::{Error, Result};
use vf_hls::EncodeJob;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Encode timeout: transcoding a long source at four renditions is slow, but
/// anything past this is a hung encoder.
const ENCODE_TIMEOUT: Duration = Duration::from_secs(4 * 3600);

/// Run the encode job to completion.
///
/// # Errors
///
/// Returns [`Error::Encode`] when ffmpeg cannot be spawned, exits non-zero,
/// is cancelled, or reports success without producing every expected
/// rendition sub-playlist (a truncated run).
pub async fn run_encode(
    tools: &ToolRegistry,
    job: &EncodeJob,
    cancel: CancellationToken,
) -> Result<()> {
    let ffmpeg = tools.require("ffmpeg")?;

    tracing::info!(
        source = %job.source.display(),
        renditions = job.outputs.len(),
        audio_index = job.audio_stream_index,
        "Encoding HLS renditions"
    );

    let mut cmd = ToolCommand::new(ffmpeg.path.clone());
    cmd.timeout(ENCODE_TIMEOUT);
    cmd.args(job.to_args());
    cmd.cancel(cancel);

    cmd.execute()
        .await
        .map_err(|e| Error::Encode(e.to_string()))?;

    validate_outputs(job)
}

/// Verify that every rendition sub-playlist the job promised actually exists.
///
/// ffmpeg can exit zero after a partial run (e.g. disk full handled late);
/// a missing playlist means the asset must not be published.
pub fn validate_outputs(job: &EncodeJob) -> Result<()> {
    for out in &job.outputs {
        if !out.playlist_path.is_file() {
            return Err(Error::Encode(format!(
                "encoder reported success but {} was not produced",
                out.playlist_path.display()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::path::{Path, PathBuf};
    use vf_core::config::EncodeConfig;
    use vf_core::{AudioTrack, InputDescriptor};
    use vf_hls::ladder;

    fn job_in(dir: &Path) -> EncodeJob {
        let plan = ladder::plan(&InputDescriptor {
            path: PathBuf::from("/uploads/in.mp4"),
            width: 1280,
            height: 720,
            audio_tracks: vec![AudioTrack {
                stream_index: 0,
                codec: "aac".into(),
            }],
        })
        .unwrap();
        EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir, &EncodeConfig::default())
            .unwrap()
    }

    #[test]
    fn validate_passes_when_all_playlists_exist() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());

        for out in &job.outputs {
            std::fs::write(&out.playlist_path, b"#EXTM3U\n").unwrap();
        }

        assert!(validate_outputs(&job).is_ok());
    }

    #[test]
    fn validate_fails_on_missing_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());

        // Write all but the last playlist.
        for out in &job.outputs[..job.outputs.len() - 1] {
            std::fs::write(&out.playlist_path, b"#EXTM3U\n").unwrap();
        }

        let result = validate_outputs(&job);
        assert_matches!(result, Err(Error::Encode(msg)) => {
            assert!(msg.contains("index.m3u8"));
        });
    }

    #[tokio::test]
    async fn run_encode_without_ffmpeg_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path());

        let cfg = vf_core::config::ToolsConfig {
            ffmpeg_path: Some(PathBuf::from("/nonexistent/ffmpeg")),
            ffprobe_path: None,
        };
        let registry = ToolRegistry::discover(&cfg);

        // Either the registry has no ffmpeg at all, or the PATH fallback
        // found one and it fails on the bogus input. Both are errors.
        let result = run_encode(&registry, &job, CancellationToken::new()).await;
        assert!(result.is_err());
    }
}
