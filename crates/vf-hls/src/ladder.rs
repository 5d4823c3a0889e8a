//! The fixed rendition ladder and the feasibility planner.
//!
//! A rendition is feasible iff its target resolution does not exceed the
//! source in either dimension -- no upscaling is ever produced. Audio
//! selection is first-compatible-match in container enumeration order, not
//! best-match; changing that would change observable selection behavior.

use vf_core::{AudioTrack, Error, InputDescriptor, Result};

/// One fixed (resolution, bitrate) encoding target in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenditionProfile {
    /// Rendition label, used as the per-rendition directory name.
    pub label: &'static str,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Average video bitrate (ffmpeg rate string, e.g. "5000k").
    pub video_bitrate: &'static str,
    /// Peak video bitrate.
    pub max_rate: &'static str,
    /// Rate-control buffer size.
    pub buf_size: &'static str,
    /// Declared bandwidth in bits/sec for the master playlist.
    pub bandwidth_bits: u64,
}

/// The rendition catalog, highest to lowest quality. Ordering is part of the
/// contract: the feasible subset preserves it, and the master playlist lists
/// renditions in exactly this order.
pub static RENDITION_LADDER: [RenditionProfile; 4] = [
    RenditionProfile {
        label: "1080p",
        width: 1920,
        height: 1080,
        video_bitrate: "5000k",
        max_rate: "5350k",
        buf_size: "7500k",
        bandwidth_bits: 5_000_000,
    },
    RenditionProfile {
        label: "720p",
        width: 1280,
        height: 720,
        video_bitrate: "2800k",
        max_rate: "2996k",
        buf_size: "4200k",
        bandwidth_bits: 2_800_000,
    },
    RenditionProfile {
        label: "480p",
        width: 854,
        height: 480,
        video_bitrate: "1400k",
        max_rate: "1498k",
        buf_size: "2100k",
        bandwidth_bits: 1_400_000,
    },
    RenditionProfile {
        label: "360p",
        width: 640,
        height: 360,
        video_bitrate: "800k",
        max_rate: "856k",
        buf_size: "1200k",
        bandwidth_bits: 800_000,
    },
];

/// Audio codecs that can be carried into an HLS output without transcoding
/// surprises. Selection scans tracks in enumeration order and takes the
/// first whose codec is in this set.
pub const COMPATIBLE_AUDIO_CODECS: [&str; 2] = ["aac", "mp3"];

/// The outcome of planning: the feasible renditions (catalog order) and the
/// selected audio track. Non-empty by construction.
#[derive(Debug, Clone)]
pub struct FeasiblePlan {
    /// Feasible subset of [`RENDITION_LADDER`], order preserved.
    pub renditions: Vec<&'static RenditionProfile>,
    /// The single audio track every rendition output maps.
    pub audio: AudioTrack,
}

/// Compute the feasible plan for a probed input.
///
/// # Errors
///
/// - [`Error::NoFeasibleRendition`] when the source resolution is below
///   every catalog entry.
/// - [`Error::NoCompatibleAudio`] when no audio track uses a codec from
///   [`COMPATIBLE_AUDIO_CODECS`].
pub fn plan(descriptor: &InputDescriptor) -> Result<FeasiblePlan> {
    let renditions: Vec<&'static RenditionProfile> = RENDITION_LADDER
        .iter()
        .filter(|p| p.width <= descriptor.width && p.height <= descriptor.height)
        .collect();

    if renditions.is_empty() {
        return Err(Error::NoFeasibleRendition {
            width: descriptor.width,
            height: descriptor.height,
        });
    }

    let audio = descriptor
        .audio_tracks
        .iter()
        .find(|t| {
            COMPATIBLE_AUDIO_CODECS
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&t.codec))
        })
        .cloned()
        .ok_or_else(|| Error::NoCompatibleAudio {
            found: descriptor
                .audio_tracks
                .iter()
                .map(|t| t.codec.clone())
                .collect(),
        })?;

    tracing::debug!(
        source = %descriptor.path.display(),
        renditions = renditions.len(),
        audio_index = audio.stream_index,
        audio_codec = %audio.codec,
        "Planned feasible renditions"
    );

    Ok(FeasiblePlan { renditions, audio })
}
