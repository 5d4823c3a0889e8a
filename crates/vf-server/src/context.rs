//! Service-oriented application context.
//!
//! [`AppContext`] is the central struct shared across all route handlers via
//! Axum state. It is cheaply cloneable because it only holds `Arc`s and a
//! cancellation token; the encode-slot semaphore is the required bound on
//! concurrent external encoder invocations.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use vf_av::ToolRegistry;
use vf_core::config::Config;
use vf_core::Result;
use vf_hls::AssetStore;

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// External tool registry.
    pub tools: Arc<ToolRegistry>,
    /// Published-asset store rooted at the HLS output directory.
    pub store: Arc<AssetStore>,
    /// Bound on concurrently running encode invocations.
    pub encode_slots: Arc<Semaphore>,
    /// Cancelled on shutdown; child tokens cancel in-flight encodes.
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Build the context: discover tools, open the asset store, and create
    /// the upload directory.
    pub fn new(config: Config) -> Result<Self> {
        let tools = Arc::new(ToolRegistry::discover(&config.tools));
        let store = Arc::new(AssetStore::new(&config.storage.hls_dir)?);
        std::fs::create_dir_all(&config.storage.upload_dir)?;

        // A zero bound would deadlock every upload; validate() already
        // warned about it.
        let slots = config.encode.max_concurrent.max(1);

        Ok(Self {
            config: Arc::new(config),
            tools,
            store,
            encode_slots: Arc::new(Semaphore::new(slots)),
            shutdown: CancellationToken::new(),
        })
    }
}
