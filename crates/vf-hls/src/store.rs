//! The published-asset store.
//!
//! [`AssetStore`] owns the output root: it allocates a unique directory per
//! upload, lists published assets by scanning immediate subdirectories, and
//! discards partial assets when a pipeline fails. Because every allocation
//! gets a fresh [`AssetId`], concurrent pipelines never write to the same
//! path and no locking is needed.

use std::path::{Path, PathBuf};

use serde::Serialize;

use vf_core::{AssetId, Error, Result};

use crate::manifest::MASTER_PLAYLIST;

/// Store rooted at the published-asset output directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

/// A freshly allocated (not yet published) asset directory.
#[derive(Debug)]
pub struct AssetDir {
    id: AssetId,
    path: PathBuf,
}

/// The on-disk result of a successful pipeline run. Never mutated after
/// creation.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedAsset {
    /// Directory name under the output root.
    pub id: AssetId,
    /// Absolute asset directory.
    pub dir: PathBuf,
    /// Path of the master playlist inside the asset directory.
    pub master_path: PathBuf,
    /// Labels of the renditions that were produced, catalog order.
    pub renditions: Vec<String>,
}

impl AssetStore {
    /// Open (creating if necessary) a store at the given output root.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The output root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a unique asset directory for a new upload.
    ///
    /// `create_dir` (not `create_dir_all`) is used so an identifier
    /// collision surfaces as an error instead of silently sharing a
    /// directory with another pipeline.
    pub fn allocate(&self) -> Result<AssetDir> {
        let id = AssetId::new();
        let path = self.root.join(id.to_string());
        std::fs::create_dir(&path).map_err(|e| {
            Error::Internal(format!(
                "failed to allocate asset dir {}: {e}",
                path.display()
            ))
        })?;

        tracing::debug!(asset_id = %id, "Allocated asset directory");

        Ok(AssetDir { id, path })
    }

    /// List the assets currently present under the output root.
    ///
    /// Each immediate subdirectory whose name parses as an [`AssetId`] is one
    /// asset; anything else is ignored.
    pub fn list(&self) -> Result<Vec<AssetId>> {
        let mut ids = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().to_string_lossy().parse::<AssetId>() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    tracing::debug!(
                        name = %entry.file_name().to_string_lossy(),
                        "Ignoring foreign directory in output root"
                    );
                }
            }
        }

        ids.sort_by_key(|id| id.to_string());
        Ok(ids)
    }

    /// Absolute path of an asset's master playlist.
    pub fn master_path(&self, id: AssetId) -> PathBuf {
        self.root.join(id.to_string()).join(MASTER_PLAYLIST)
    }

    /// Whether an asset completed its pipeline (its master playlist exists).
    pub fn is_published(&self, id: AssetId) -> bool {
        self.master_path(id).is_file()
    }

    /// Remove an asset directory and everything in it. Best-effort: failures
    /// are logged, not propagated, since discard runs on error paths.
    pub fn discard(&self, id: AssetId) {
        let path = self.root.join(id.to_string());
        if let Err(e) = std::fs::remove_dir_all(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(asset_id = %id, "Failed to discard asset directory: {e}");
            }
        } else {
            tracing::debug!(asset_id = %id, "Discarded asset directory");
        }
    }
}

impl AssetDir {
    /// The asset identifier (also the directory name).
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Absolute path of the asset directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the master playlist inside this asset directory.
    pub fn master_path(&self) -> PathBuf {
        self.path.join(MASTER_PLAYLIST)
    }
}
