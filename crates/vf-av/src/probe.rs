//! ffprobe-backed media inspection.
//!
//! Two invocations per upload: one for the primary video stream's geometry
//! (csv output, `<width>x<height>`), one enumerating audio streams with
//! their container-relative index and codec name (JSON output). Any non-zero
//! exit or unparsable output aborts the upload with [`vf_core::Error::Probe`]
//! carrying the raw diagnostic text; a probe is never retried.

use std::path::Path;

use serde::Deserialize;

use vf_core::{AudioTrack, Error, InputDescriptor, Result};

use crate::command::ToolCommand;
use crate::tools::{ToolConfig, ToolRegistry};

/// Inspect an input file, producing its immutable [`InputDescriptor`].
pub async fn inspect(tools: &ToolRegistry, path: &Path) -> Result<InputDescriptor> {
    let ffprobe = tools.require("ffprobe")?;

    let (width, height) = probe_geometry(ffprobe, path).await?;
    let audio_tracks = probe_audio(ffprobe, path).await?;

    tracing::debug!(
        source = %path.display(),
        width,
        height,
        audio_tracks = audio_tracks.len(),
        "Probed input"
    );

    Ok(InputDescriptor {
        path: path.to_path_buf(),
        width,
        height,
        audio_tracks,
    })
}

async fn probe_geometry(ffprobe: &ToolConfig, path: &Path) -> Result<(u32, u32)> {
    let mut cmd = ToolCommand::new(ffprobe.path.clone());
    cmd.timeout(ffprobe.timeout);
    cmd.args([
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=width,height",
        "-of",
        "csv=p=0:s=x",
    ]);
    cmd.arg(path.to_string_lossy().as_ref());

    let output = cmd
        .execute()
        .await
        .map_err(|e| Error::Probe(e.to_string()))?;

    parse_geometry(&output.stdout)
}

async fn probe_audio(ffprobe: &ToolConfig, path: &Path) -> Result<Vec<AudioTrack>> {
    let mut cmd = ToolCommand::new(ffprobe.path.clone());
    cmd.timeout(ffprobe.timeout);
    cmd.args([
        "-v",
        "error",
        "-select_streams",
        "a",
        "-show_entries",
        "stream=index,codec_type,codec_name",
        "-of",
        "json",
    ]);
    cmd.arg(path.to_string_lossy().as_ref());

    let output = cmd
        .execute()
        .await
        .map_err(|e| Error::Probe(e.to_string()))?;

    parse_audio_streams(&output.stdout)
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    codec_type: Option<String>,
    codec_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse the `<width>x<height>` line ffprobe prints for the primary video
/// stream. Missing, malformed, or non-positive geometry is a probe failure.
fn parse_geometry(stdout: &str) -> Result<(u32, u32)> {
    let line = stdout
        .trim()
        .lines()
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| Error::Probe("ffprobe returned no video geometry".into()))?;

    let (w, h) = line
        .split_once('x')
        .ok_or_else(|| Error::Probe(format!("unparsable geometry line: {line:?}")))?;

    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| Error::Probe(format!("unparsable geometry line: {line:?}")))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| Error::Probe(format!("unparsable geometry line: {line:?}")))?;

    if width == 0 || height == 0 {
        return Err(Error::Probe(format!(
            "source reports degenerate geometry {width}x{height}"
        )));
    }

    Ok((width, height))
}

/// Parse ffprobe's JSON stream enumeration into audio tracks, preserving
/// container enumeration order and container-relative indices.
fn parse_audio_streams(stdout: &str) -> Result<Vec<AudioTrack>> {
    let ff: FfprobeOutput = serde_json::from_str(stdout)
        .map_err(|e| Error::Probe(format!("ffprobe JSON parse error: {e}")))?;

    Ok(ff
        .streams
        .into_iter()
        .filter(|s| s.codec_type.as_deref().unwrap_or("audio") == "audio")
        .map(|s| AudioTrack {
            stream_index: s.index,
            codec: s.codec_name.unwrap_or_default(),
        })
        .collect())
}
