use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Extension, Router};
use bizdesk_application::{settings_metrics_guard, settings_permissions_guard};
use bizdesk_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

#[cfg(test)]
mod tests;

use cors::build_cors_layer;

pub fn build_router(
    app_state: AppState,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let settings_permissions_routes = Router::new()
        .route(
            "/api/settings/permissions",
            get(handlers::permissions::settings_permissions_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_page_access,
        ))
        .layer(Extension(settings_permissions_guard()?));

    let metrics_routes = Router::new()
        .route(
            "/api/metrics",
            get(handlers::metrics::list_metrics_handler)
                .post(handlers::metrics::create_metric_handler),
        )
        .route(
            "/api/metrics/{metric_id}",
            get(handlers::metrics::get_metric_handler)
                .put(handlers::metrics::update_metric_handler)
                .delete(handlers::metrics::delete_metric_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_page_access,
        ))
        .layer(Extension(settings_metrics_guard()?));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/navigation",
            get(handlers::navigation::visible_navigation_handler),
        )
        .route(
            "/api/navigation/resolved",
            get(handlers::navigation::resolved_navigation_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::permissions::permissions_handler),
        )
        .route(
            "/api/pages/access",
            get(handlers::pages::page_access_handler),
        )
        .merge(settings_permissions_routes)
        .merge(metrics_routes)
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = build_cors_layer(&app_state.frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
