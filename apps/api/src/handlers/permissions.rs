use axum::Json;
use axum::extract::{Extension, Query, State};
use bizdesk_application::AuthContext;
use serde::Deserialize;
use tower_sessions::Session;

use crate::auth::store_auth_context;
use crate::dto::PermissionSetResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PermissionsQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Returns the cached permission set, or a fresh one with `?refresh=true`.
pub async fn permissions_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(mut context): Extension<AuthContext>,
    Query(query): Query<PermissionsQuery>,
) -> ApiResult<Json<PermissionSetResponse>> {
    let permissions = state
        .permission_guard
        .permissions(&mut context, query.refresh)
        .await?;
    store_auth_context(&session, &context).await?;

    Ok(Json(PermissionSetResponse::from(&permissions)))
}

/// Backing data of the permissions settings page; served behind its guard.
pub async fn settings_permissions_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(mut context): Extension<AuthContext>,
) -> ApiResult<Json<PermissionSetResponse>> {
    let permissions = state.permission_guard.permissions(&mut context, false).await?;
    store_auth_context(&session, &context).await?;

    Ok(Json(PermissionSetResponse::from(&permissions)))
}
