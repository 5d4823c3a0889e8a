//! Master playlist assembly.
//!
//! Rendering is a pure function of the feasible plan so re-running it yields
//! byte-identical output. The write goes through a temporary file and a
//! rename, so a reader never observes a partially written manifest.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use vf_core::{Error, Result};

use crate::ladder::FeasiblePlan;
use crate::plan::RENDITION_PLAYLIST;

/// File name of the master playlist at the asset root.
pub const MASTER_PLAYLIST: &str = "master.m3u8";

/// Render the master playlist for a feasible plan.
///
/// One `#EXT-X-STREAM-INF` entry per rendition, in catalog order (descending
/// quality), each followed by the relative path to that rendition's
/// sub-playlist.
pub fn render_master(plan: &FeasiblePlan) -> String {
    let mut out = String::new();

    writeln!(out, "#EXTM3U").unwrap();

    for rendition in &plan.renditions {
        writeln!(
            out,
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}x{}",
            rendition.bandwidth_bits, rendition.width, rendition.height
        )
        .unwrap();
        writeln!(out, "{}/{}", rendition.label, RENDITION_PLAYLIST).unwrap();
    }

    out
}

/// Write the master playlist into `asset_dir`, atomically.
///
/// The content is written to `master.m3u8.tmp` and renamed into place, so
/// the final path either holds a complete manifest or does not exist.
///
/// # Errors
///
/// Returns [`Error::Write`] if the temporary write or the rename fails.
pub fn write_master(plan: &FeasiblePlan, asset_dir: &Path) -> Result<PathBuf> {
    let content = render_master(plan);
    let final_path = asset_dir.join(MASTER_PLAYLIST);
    let tmp_path = asset_dir.join(format!("{MASTER_PLAYLIST}.tmp"));

    std::fs::write(&tmp_path, &content).map_err(|e| Error::write(&tmp_path, e))?;
    std::fs::rename(&tmp_path, &final_path).map_err(|e| Error::write(&final_path, e))?;

    tracing::info!(path = %final_path.display(), variants = plan.renditions.len(), "Wrote master playlist");

    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder;
    use std::path::PathBuf;
    use vf_core::{AudioTrack, InputDescriptor};

    fn feasible_plan(width: u32, height: u32) -> FeasiblePlan {
        ladder::plan(&InputDescriptor {
            path: PathBuf::from("/uploads/input.mp4"),
            width,
            height,
            audio_tracks: vec![AudioTrack {
                stream_index: 0,
                codec: "aac".into(),
            }],
        })
        .unwrap()
    }

    #[test]
    fn master_playlist_format_exact() {
        let plan = feasible_plan(1280, 720);
        let m3u8 = render_master(&plan);

        let expected = "\
#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1280x720
720p/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=1400000,RESOLUTION=854x480
480p/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360
360p/index.m3u8
";
        assert_eq!(m3u8, expected);
    }

    #[test]
    fn entry_count_matches_feasible_set() {
        let plan = feasible_plan(1920, 1080);
        let m3u8 = render_master(&plan);
        let entries = m3u8.matches("#EXT-X-STREAM-INF").count();
        assert_eq!(entries, plan.renditions.len());
        assert_eq!(entries, 4);
    }

    #[test]
    fn bandwidths_are_monotonically_non_increasing() {
        let plan = feasible_plan(1920, 1080);
        let m3u8 = render_master(&plan);

        let bandwidths: Vec<u64> = m3u8
            .lines()
            .filter_map(|l| l.strip_prefix("#EXT-X-STREAM-INF:BANDWIDTH="))
            .map(|rest| {
                rest.split(',')
                    .next()
                    .unwrap()
                    .parse()
                    .expect("bandwidth is numeric")
            })
            .collect();

        assert_eq!(bandwidths, vec![5_000_000, 2_800_000, 1_400_000, 800_000]);
        assert!(bandwidths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let plan = feasible_plan(1920, 1080);
        assert_eq!(render_master(&plan), render_master(&plan));
    }

    #[test]
    fn write_is_idempotent_and_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(1920, 1080);

        let first_path = write_master(&plan, dir.path()).unwrap();
        let first = std::fs::read(&first_path).unwrap();

        let second_path = write_master(&plan, dir.path()).unwrap();
        let second = std::fs::read(&second_path).unwrap();

        assert_eq!(first_path, second_path);
        assert_eq!(first, second);
    }

    #[test]
    fn write_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(640, 360);

        write_master(&plan, dir.path()).unwrap();

        assert!(dir.path().join(MASTER_PLAYLIST).is_file());
        assert!(!dir.path().join("master.m3u8.tmp").exists());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(640, 360);
        let missing = dir.path().join("gone");

        let result = write_master(&plan, &missing);
        assert!(matches!(result, Err(Error::Write { .. })));
    }
}
