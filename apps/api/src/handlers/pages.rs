use axum::Json;
use axum::extract::{Extension, Query, State};
use bizdesk_application::AuthContext;
use bizdesk_core::AppError;
use bizdesk_domain::PageAccess;
use serde::Deserialize;
use tower_sessions::Session;

use crate::auth::store_auth_context;
use crate::dto::PageAccessResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageAccessQuery {
    pub path: String,
}

/// Evaluates the front-end route table for one page path.
pub async fn page_access_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(mut context): Extension<AuthContext>,
    Query(query): Query<PageAccessQuery>,
) -> ApiResult<Json<PageAccessResponse>> {
    let route = state
        .route_table
        .match_path(query.path.as_str())
        .ok_or_else(|| AppError::NotFound(format!("no page matches '{}'", query.path)))?;

    let response = match route.access() {
        PageAccess::Public | PageAccess::Authenticated => {
            PageAccessResponse::granted(&query.path, route.pattern(), route.access())
        }
        PageAccess::Guarded(rule) => {
            let outcome = state.permission_guard.check(&mut context, rule).await;
            store_auth_context(&session, &context).await?;
            PageAccessResponse::from_outcome(&query.path, route.pattern(), route.access(), &outcome)
        }
    };

    Ok(Json(response))
}
