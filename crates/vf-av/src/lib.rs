//! # vf-av
//!
//! External tool plumbing for the vodforge pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Command execution** ([`ToolCommand`]) -- async argument-list builder
//!   with timeout and cancellation support for running external processes.
//! - **Media inspection** ([`probe::inspect`]) -- the ffprobe-backed
//!   inspector producing an [`vf_core::InputDescriptor`].
//! - **Encode execution** ([`encode::run_encode`]) -- the ffmpeg-backed
//!   executor for a built [`vf_hls::EncodeJob`], including post-run output
//!   validation.

pub mod command;
pub mod encode;
pub mod probe;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use encode::run_encode;
pub use probe::inspect;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
