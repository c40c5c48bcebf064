use axum::Json;
use axum::extract::{Extension, State};
use bizdesk_application::AuthContext;

use crate::dto::MenuItemResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Menu tree filtered to the entries the user may see.
pub async fn visible_navigation_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Json<Vec<MenuItemResponse>>> {
    let tree = state.navigation_service.navigation(&context).await?;
    Ok(Json(MenuItemResponse::from_tree(&tree.visible)))
}

pub async fn resolved_navigation_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Json<Vec<MenuItemResponse>>> {
    let tree = state.navigation_service.navigation(&context).await?;
    Ok(Json(MenuItemResponse::from_tree(&tree.resolved)))
}
