//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for server, storage, tools, and encoding. Every section
//! defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub tools: ToolsConfig,
    pub encode: EncodeConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.max_upload_mb == 0 {
            warnings.push("server.max_upload_mb is 0; all uploads will be rejected".into());
        }

        if self.encode.max_concurrent == 0 {
            warnings.push(
                "encode.max_concurrent is 0; treating it as 1 so encodes can run".into(),
            );
        }

        if self.encode.segment_seconds == 0 {
            warnings.push("encode.segment_seconds is 0; ffmpeg will reject the job".into());
        }

        if self.storage.upload_dir == self.storage.hls_dir {
            warnings.push(
                "storage.upload_dir and storage.hls_dir are the same directory; \
                 uploads will be listed as assets".into(),
            );
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional directory served as the UI fallback.
    pub static_dir: Option<PathBuf>,
    /// Maximum accepted upload body size in mebibytes.
    pub max_upload_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            static_dir: None,
            max_upload_mb: 2048,
        }
    }
}

/// On-disk storage layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where raw uploads are saved before transcoding.
    pub upload_dir: PathBuf,
    /// Output root for published HLS assets (one subdirectory per asset).
    pub hls_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./data/uploads"),
            hls_dir: PathBuf::from("./data/hls"),
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

/// Encoding defaults applied to every rendition output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Target HLS segment duration in seconds.
    pub segment_seconds: u32,
    /// Audio bitrate for the transcoded AAC track.
    pub audio_bitrate: String,
    /// Video encoder passed to ffmpeg's `-c:v`.
    pub video_codec: String,
    /// Upper bound on concurrently running encode invocations.
    pub max_concurrent: usize,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            segment_seconds: 10,
            audio_bitrate: "128k".into(),
            video_codec: "libx264".into(),
            max_concurrent: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.hls_dir, PathBuf::from("./data/hls"));
        assert_eq!(cfg.encode.segment_seconds, 10);
        assert_eq!(cfg.encode.video_codec, "libx264");
        assert_eq!(cfg.encode.max_concurrent, 2);
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "encode": {"segment_seconds": 6}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.encode.segment_seconds, 6);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.encode.audio_bitrate, "128k");
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn invalid_json_is_a_validation_error() {
        let result = Config::from_json("{not json");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn load_or_default_with_none() {
        let cfg = Config::load_or_default(None);
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/config.json")));
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn zero_concurrency_warns() {
        let mut cfg = Config::default();
        cfg.encode.max_concurrent = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("max_concurrent")));
    }

    #[test]
    fn shared_storage_dirs_warn() {
        let mut cfg = Config::default();
        cfg.storage.upload_dir = PathBuf::from("/data/shared");
        cfg.storage.hls_dir = PathBuf::from("/data/shared");
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("same directory")));
    }
}
