//! # vf-hls
//!
//! The adaptive-bitrate decision core: rendition planning, encode plan
//! construction, master playlist assembly, and the published-asset store.
//!
//! This crate provides:
//!
//! - **Rendition ladder** ([`ladder`]) -- the fixed catalog of
//!   resolution/bitrate profiles and the feasibility planner that maps an
//!   [`vf_core::InputDescriptor`] onto it.
//! - **Encode plan** ([`plan`]) -- translation of a feasible plan into one
//!   fan-out ffmpeg invocation (filter graph + per-rendition output targets),
//!   built as a structured argument list.
//! - **Manifest assembly** ([`manifest`]) -- deterministic master playlist
//!   rendering and atomic write.
//! - **Asset store** ([`store`]) -- output-directory layout, unique asset
//!   identity, listing, and discard of partial assets.
//!
//! Everything here is pure logic plus plain filesystem I/O; process spawning
//! lives in `vf-av`.

pub mod ladder;
pub mod manifest;
pub mod plan;
pub mod store;

// ---- Re-exports for convenience ----

pub use ladder::{FeasiblePlan, RenditionProfile, RENDITION_LADDER};
pub use manifest::{render_master, write_master};
pub use plan::{EncodeJob, OutputTarget};
pub use store::{AssetDir, AssetStore, PublishedAsset};
