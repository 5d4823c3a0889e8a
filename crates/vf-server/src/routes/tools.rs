//! External tool availability route handlers.

use axum::extract::State;
use axum::Json;

use vf_av::ToolInfo;

use crate::context::AppContext;

/// GET /api/tools
#[utoipa::path(
    get,
    path = "/api/tools",
    responses(
        (status = 200, description = "External tool availability", body = Vec<ToolInfo>)
    )
)]
pub async fn tool_report(State(ctx): State<AppContext>) -> Json<Vec<ToolInfo>> {
    Json(ctx.tools.check_all())
}
