//! Encode plan construction.
//!
//! A [`FeasiblePlan`] becomes one fan-out ffmpeg invocation: the source is
//! decoded once, a `scale` filter branch produces each rendition's frames,
//! and every output target maps its scaled branch plus the shared audio
//! track into a segmented HLS rendition. The invocation is built as a
//! structured argument list -- never an interpolated shell string.

use std::path::{Path, PathBuf};

use vf_core::config::EncodeConfig;
use vf_core::Result;

use crate::ladder::{FeasiblePlan, RenditionProfile};

/// Fixed name of every rendition's sub-playlist.
pub const RENDITION_PLAYLIST: &str = "index.m3u8";

/// Segment filename template inside a rendition directory.
const SEGMENT_PATTERN: &str = "segment_%05d.ts";

/// One rendition's output destination within the encode job.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    /// The catalog profile this target encodes.
    pub rendition: &'static RenditionProfile,
    /// Per-rendition directory under the asset root.
    pub dir: PathBuf,
    /// Segment filename template passed to `-hls_segment_filename`.
    pub segment_pattern: PathBuf,
    /// The rendition sub-playlist ffmpeg writes.
    pub playlist_path: PathBuf,
}

/// A fully constructed encode invocation. Transient; exists only for the
/// duration of one encode.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Source file to decode.
    pub source: PathBuf,
    /// Fan-out scale graph: one branch per rendition off the single decode.
    pub filter_graph: String,
    /// Container-relative index of the selected audio stream.
    pub audio_stream_index: u32,
    /// Output targets in catalog order.
    pub outputs: Vec<OutputTarget>,
    segment_seconds: u32,
    audio_bitrate: String,
    video_codec: String,
}

impl EncodeJob {
    /// Build the encode job for a feasible plan, creating the per-rendition
    /// directories under `asset_dir`.
    pub fn build(
        source: &Path,
        plan: &FeasiblePlan,
        asset_dir: &Path,
        encode: &EncodeConfig,
    ) -> Result<Self> {
        let mut branches = Vec::with_capacity(plan.renditions.len());
        let mut outputs = Vec::with_capacity(plan.renditions.len());

        for (i, rendition) in plan.renditions.iter().copied().enumerate() {
            branches.push(format!(
                "[0:v]scale=w={}:h={}[v{i}]",
                rendition.width, rendition.height
            ));

            let dir = asset_dir.join(rendition.label);
            std::fs::create_dir_all(&dir)?;

            outputs.push(OutputTarget {
                rendition,
                segment_pattern: dir.join(SEGMENT_PATTERN),
                playlist_path: dir.join(RENDITION_PLAYLIST),
                dir,
            });
        }

        Ok(Self {
            source: source.to_path_buf(),
            filter_graph: branches.join("; "),
            audio_stream_index: plan.audio.stream_index,
            outputs,
            segment_seconds: encode.segment_seconds,
            audio_bitrate: encode.audio_bitrate.clone(),
            video_codec: encode.video_codec.clone(),
        })
    }

    /// The complete ffmpeg argument vector for this job.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-nostdin".into(),
            "-i".into(),
            self.source.to_string_lossy().into_owned(),
            "-filter_complex".into(),
            self.filter_graph.clone(),
        ];

        for (i, out) in self.outputs.iter().enumerate() {
            let r = out.rendition;
            args.extend([
                "-map".into(),
                format!("[v{i}]"),
                "-map".into(),
                format!("0:{}", self.audio_stream_index),
                "-c:v".into(),
                self.video_codec.clone(),
                "-b:v".into(),
                r.video_bitrate.into(),
                "-maxrate".into(),
                r.max_rate.into(),
                "-bufsize".into(),
                r.buf_size.into(),
                "-c:a".into(),
                "aac".into(),
                "-b:a".into(),
                self.audio_bitrate.clone(),
                "-f".into(),
                "hls".into(),
                "-hls_time".into(),
                self.segment_seconds.to_string(),
                "-hls_playlist_type".into(),
                "vod".into(),
                "-hls_segment_filename".into(),
                out.segment_pattern.to_string_lossy().into_owned(),
                out.playlist_path.to_string_lossy().into_owned(),
            ]);
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder;
    use std::path::PathBuf;
    use vf_core::{AudioTrack, InputDescriptor};

    fn feasible_plan(width: u32, height: u32, audio_index: u32) -> FeasiblePlan {
        ladder::plan(&InputDescriptor {
            path: PathBuf::from("/uploads/input.mp4"),
            width,
            height,
            audio_tracks: vec![AudioTrack {
                stream_index: audio_index,
                codec: "aac".into(),
            }],
        })
        .unwrap()
    }

    #[test]
    fn build_creates_rendition_directories() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(1920, 1080, 0);
        let job =
            EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &Default::default())
                .unwrap();

        assert_eq!(job.outputs.len(), 4);
        for out in &job.outputs {
            assert!(out.dir.is_dir(), "missing {:?}", out.dir);
            assert_eq!(out.playlist_path.file_name().unwrap(), "index.m3u8");
        }
        assert!(dir.path().join("1080p").is_dir());
        assert!(dir.path().join("360p").is_dir());
    }

    #[test]
    fn filter_graph_shares_one_decode() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(1920, 1080, 0);
        let job =
            EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &Default::default())
                .unwrap();

        assert_eq!(
            job.filter_graph,
            "[0:v]scale=w=1920:h=1080[v0]; [0:v]scale=w=1280:h=720[v1]; \
             [0:v]scale=w=854:h=480[v2]; [0:v]scale=w=640:h=360[v3]"
        );
    }

    #[test]
    fn args_contain_a_single_input() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(1920, 1080, 0);
        let job =
            EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &Default::default())
                .unwrap();

        let args = job.to_args();
        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 1);
        assert_eq!(args.iter().filter(|a| *a == "-filter_complex").count(), 1);
    }

    #[test]
    fn args_map_every_rendition_and_the_shared_audio() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(1280, 720, 2);
        let job =
            EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &Default::default())
                .unwrap();

        let args = job.to_args();
        // Two -map entries per output: the scaled branch and the audio stream.
        assert_eq!(
            args.iter().filter(|a| *a == "-map").count(),
            job.outputs.len() * 2
        );
        assert_eq!(args.iter().filter(|a| *a == "0:2").count(), 3);
        assert!(args.contains(&"[v0]".to_string()));
        assert!(args.contains(&"[v2]".to_string()));
    }

    #[test]
    fn args_carry_per_rendition_rate_limits() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(1920, 1080, 0);
        let job =
            EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &Default::default())
                .unwrap();

        let args = job.to_args();
        for rate in ["5000k", "2800k", "1400k", "800k"] {
            assert!(args.contains(&rate.to_string()), "missing bitrate {rate}");
        }
        assert!(args.contains(&"vod".to_string()));
        assert!(args.contains(&"10".to_string()));
    }

    #[test]
    fn segment_pattern_lives_in_the_rendition_dir() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(640, 360, 0);
        let job =
            EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &Default::default())
                .unwrap();

        assert_eq!(job.outputs.len(), 1);
        let out = &job.outputs[0];
        assert_eq!(out.segment_pattern, dir.path().join("360p/segment_%05d.ts"));
        assert_eq!(out.playlist_path, dir.path().join("360p/index.m3u8"));
    }

    #[test]
    fn encode_config_overrides_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let plan = feasible_plan(640, 360, 0);
        let encode = EncodeConfig {
            segment_seconds: 6,
            audio_bitrate: "192k".into(),
            video_codec: "libx265".into(),
            max_concurrent: 1,
        };
        let job = EncodeJob::build(Path::new("/uploads/in.mp4"), &plan, dir.path(), &encode)
            .unwrap();

        let args = job.to_args();
        assert!(args.contains(&"6".to_string()));
        assert!(args.contains(&"192k".to_string()));
        assert!(args.contains(&"libx265".to_string()));
    }
}
