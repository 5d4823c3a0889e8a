//! Media-domain types produced by probing an input file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One audio stream inside the source container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Container-relative stream index as reported by the prober. This is
    /// the index passed to the encoder's `-map 0:<index>`, not the track's
    /// position in the enumeration.
    pub stream_index: u32,
    /// Codec name as reported by the prober (e.g. "aac", "opus").
    pub codec: String,
}

/// Immutable description of an uploaded source file, produced once per
/// upload by the media inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Filesystem location of the saved upload.
    pub path: PathBuf,
    /// Primary video stream width in pixels.
    pub width: u32,
    /// Primary video stream height in pixels.
    pub height: u32,
    /// Audio tracks in container enumeration order.
    pub audio_tracks: Vec<AudioTrack>,
}

impl InputDescriptor {
    /// Source resolution as a `(width, height)` pair.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serde_roundtrip() {
        let descriptor = InputDescriptor {
            path: PathBuf::from("/uploads/movie.mp4"),
            width: 1920,
            height: 1080,
            audio_tracks: vec![AudioTrack {
                stream_index: 1,
                codec: "aac".into(),
            }],
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        let back: InputDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(descriptor, back);
    }

    #[test]
    fn resolution_pair() {
        let descriptor = InputDescriptor {
            path: PathBuf::from("/uploads/clip.mkv"),
            width: 1280,
            height: 720,
            audio_tracks: vec![],
        };
        assert_eq!(descriptor.resolution(), (1280, 720));
    }
}
