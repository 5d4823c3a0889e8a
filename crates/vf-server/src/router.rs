//! Axum router construction.
//!
//! Builds the full application router with all route groups, middleware
//! layers, and static serving of the published HLS tree.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::upload::upload_video,
        routes::videos::list_videos,
        routes::tools::tool_report,
    ),
    components(schemas(
        routes::upload::UploadResponse,
        routes::videos::VideoListResponse,
        vf_av::ToolInfo,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = (ctx.config.server.max_upload_mb as usize) * 1024 * 1024;

    let api = Router::new()
        .route("/upload", post(routes::upload::upload_video))
        .route("/videos", get(routes::videos::list_videos))
        .route("/tools", get(routes::tools::tool_report));

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Published assets: outputRoot/<assetId>/master.m3u8 plus the
        // per-rendition playlists and segments below it.
        .nest_service("/hls", ServeDir::new(ctx.store.root()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx.clone());

    // Static file serving for UI build.
    if let Some(dir) = &ctx.config.server.static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}
