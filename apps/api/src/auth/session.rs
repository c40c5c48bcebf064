use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use bizdesk_application::LoginCredentials;
use bizdesk_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::{LoginRequest, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{load_auth_context, store_auth_context};

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let mut context = load_auth_context(&session).await?;
    let credentials = LoginCredentials {
        email: payload.email,
        password: payload.password,
    };

    let identity = state.auth_service.login(&mut context, &credentials).await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    store_auth_context(&session, &context).await?;

    Ok(Json(UserIdentityResponse::from(identity)))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    let mut context = load_auth_context(&session).await?;
    state.auth_service.logout(&mut context).await;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    Extension(identity): Extension<UserIdentity>,
) -> Json<UserIdentityResponse> {
    Json(UserIdentityResponse::from(identity))
}
