use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bizdesk_application::AuthContext;
use bizdesk_core::AppError;
use bizdesk_domain::RouteGuard;
use tower_sessions::Session;
use tracing::info;

use crate::auth::{load_auth_context, store_auth_context};
use crate::dto::GuardDeniedResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Rejects requests without an authenticated session and exposes the session's
/// `AuthContext` and `UserIdentity` as request extensions.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let context = load_auth_context(&session).await?;
    let identity = context
        .identity()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Runs the `RouteGuard` extension of the route against the session.
///
/// Denials answer 403 with the guard's reason. Permission sets fetched while
/// checking are written back to the session cache.
pub async fn require_page_access(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let rule = request
        .extensions()
        .get::<RouteGuard>()
        .cloned()
        .ok_or_else(|| AppError::Internal("route guard is not configured".to_owned()))?;
    let mut context = match request.extensions().get::<AuthContext>() {
        Some(context) => context.clone(),
        None => load_auth_context(&session).await?,
    };

    let outcome = state.permission_guard.check(&mut context, &rule).await;
    if context.is_authenticated() {
        store_auth_context(&session, &context).await?;
    }

    if let Some(reason) = outcome.denial_reason() {
        info!(
            path = %request.uri().path(),
            reason = %reason.message(),
            "page access denied"
        );
        return Ok((
            StatusCode::FORBIDDEN,
            Json(GuardDeniedResponse::from(reason)),
        )
            .into_response());
    }

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Rejects state-changing requests whose origin is not the configured frontend.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.trim_end_matches('/');
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer == allowed_origin
            || referer
                .strip_prefix(allowed_origin)
                .is_some_and(|rest| rest.starts_with('/'));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
