use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, COOKIE, ORIGIN, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_config::BackendMode;
use crate::api_services::{build_app_state, build_backend_ports, build_session_layer};
use crate::dev_seed::{DEMO_ADMIN_EMAIL, DEMO_OPERATOR_EMAIL, DEMO_PASSWORD};

use super::build_router;

const FRONTEND_URL: &str = "http://localhost:3000";

async fn test_router() -> Router {
    let ports = build_backend_ports(&BackendMode::Memory)
        .await
        .unwrap_or_else(|_| unreachable!());
    let state = build_app_state(ports, FRONTEND_URL).unwrap_or_else(|_| unreachable!());

    build_router(state, build_session_layer(false, 30)).unwrap_or_else(|_| unreachable!())
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }

    let body = match body {
        Some(body) => {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .header(ORIGIN, FRONTEND_URL);
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).unwrap_or_else(|_| unreachable!())
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!())
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|_| unreachable!());
    serde_json::from_slice(&bytes).unwrap_or_else(|_| unreachable!())
}

async fn login(router: &Router, email: &str) -> String {
    let response = send(
        router,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": email, "password": DEMO_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| unreachable!())
}

#[tokio::test]
async fn health_is_public() {
    let router = test_router().await;
    let response = send(&router, request(Method::GET, "/health", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"status": "ok", "backend": "memory"})
    );
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let router = test_router().await;

    for uri in ["/auth/me", "/api/navigation", "/api/metrics", "/api/settings/permissions"] {
        let response = send(&router, request(Method::GET, uri, None, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let router = test_router().await;

    let wrong = send(
        &router,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": DEMO_ADMIN_EMAIL, "password": "nope"})),
        ),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let blank = send(
        &router,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": " ", "password": ""})),
        ),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_from_other_origins_are_blocked() {
    let router = test_router().await;
    let foreign = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .header(ORIGIN, "https://evil.example.com")
        .body(Body::from(
            json!({"email": DEMO_ADMIN_EMAIL, "password": DEMO_PASSWORD}).to_string(),
        ))
        .unwrap_or_else(|_| unreachable!());

    let response = send(&router, foreign).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn navigation_hides_settings_from_operator() {
    let router = test_router().await;
    let admin = login(&router, DEMO_ADMIN_EMAIL).await;
    let operator = login(&router, DEMO_OPERATOR_EMAIL).await;

    let admin_menu = json_body(
        send(&router, request(Method::GET, "/api/navigation", Some(&admin), None)).await,
    )
    .await;
    let operator_menu = json_body(
        send(&router, request(Method::GET, "/api/navigation", Some(&operator), None)).await,
    )
    .await;
    let operator_resolved = json_body(
        send(
            &router,
            request(Method::GET, "/api/navigation/resolved", Some(&operator), None),
        )
        .await,
    )
    .await;

    assert_eq!(admin_menu.as_array().map(Vec::len), Some(5));
    assert_eq!(admin_menu[4]["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(operator_menu.as_array().map(Vec::len), Some(4));
    assert_eq!(operator_resolved.as_array().map(Vec::len), Some(5));
    assert_eq!(operator_resolved[4]["icon"], json!("Settings"));
}

#[tokio::test]
async fn me_returns_the_session_identity() {
    let router = test_router().await;
    let cookie = login(&router, DEMO_ADMIN_EMAIL).await;

    let body = json_body(send(&router, request(Method::GET, "/auth/me", Some(&cookie), None)).await)
        .await;
    assert_eq!(body["display_name"], json!("Administrator"));
    assert_eq!(body["email"], json!(DEMO_ADMIN_EMAIL));
}

#[tokio::test]
async fn guarded_api_denies_with_reason() {
    let router = test_router().await;
    let operator = login(&router, DEMO_OPERATOR_EMAIL).await;

    let metrics = send(&router, request(Method::GET, "/api/metrics", Some(&operator), None)).await;
    assert_eq!(metrics.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(metrics).await,
        json!({
            "state": "denied",
            "reason": "missing_permission",
            "message": "missing permission 'settings.metrics.view'"
        })
    );

    let settings = send(
        &router,
        request(Method::GET, "/api/settings/permissions", Some(&operator), None),
    )
    .await;
    assert_eq!(settings.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(settings).await["reason"], json!("missing_permission"));
}

#[tokio::test]
async fn admin_manages_metrics_behind_the_guard() {
    let router = test_router().await;
    let admin = login(&router, DEMO_ADMIN_EMAIL).await;

    let listed = send(
        &router,
        request(Method::GET, "/api/metrics?year=2025&month=2", Some(&admin), None),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(json_body(listed).await.as_array().map(Vec::len), Some(1));

    let created = send(
        &router,
        request(
            Method::POST,
            "/api/metrics",
            Some(&admin),
            Some(json!({
                "user_id": "1",
                "period": "2025-04-30",
                "investment": 5100.0,
                "visitors": 2210,
                "bot_conversations": 221,
                "human_conversations": 55,
                "proposals": 18,
                "closed_deals": 5
            })),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    let metric_uri = format!("/api/metrics/{}", created["id"].as_str().unwrap_or_default());

    let updated = send(
        &router,
        request(
            Method::PUT,
            &metric_uri,
            Some(&admin),
            Some(json!({"closed_deals": 7})),
        ),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(json_body(updated).await["closed_deals"], json!(7));

    let invalid = send(
        &router,
        request(Method::PUT, &metric_uri, Some(&admin), Some(json!({}))),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let mut delete = request(Method::DELETE, &metric_uri, Some(&admin), None);
    delete
        .headers_mut()
        .insert(ORIGIN, FRONTEND_URL.parse().unwrap_or_else(|_| unreachable!()));
    assert_eq!(send(&router, delete).await.status(), StatusCode::NO_CONTENT);

    let missing = send(&router, request(Method::GET, &metric_uri, Some(&admin), None)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_access_reports_guard_states() {
    let router = test_router().await;
    let admin = login(&router, DEMO_ADMIN_EMAIL).await;
    let operator = login(&router, DEMO_OPERATOR_EMAIL).await;

    let hidden = json_body(
        send(
            &router,
            request(
                Method::GET,
                "/api/pages/access?path=/settings/users",
                Some(&operator),
                None,
            ),
        )
        .await,
    )
    .await;
    assert_eq!(hidden["state"], json!("denied"));
    assert_eq!(hidden["reason"], json!("menu_path_hidden"));
    assert_eq!(
        hidden["states"],
        json!(["loading_permissions", "checking", "denied"])
    );

    let granted = json_body(
        send(
            &router,
            request(
                Method::GET,
                "/api/pages/access?path=/settings/permissions",
                Some(&admin),
                None,
            ),
        )
        .await,
    )
    .await;
    assert_eq!(granted["state"], json!("granted"));
    assert_eq!(granted["access"], json!("guarded"));
    assert_eq!(
        granted["states"],
        json!(["loading_permissions", "checking", "granted"])
    );

    let client_page = json_body(
        send(
            &router,
            request(
                Method::GET,
                "/api/pages/access?path=/clients/42",
                Some(&operator),
                None,
            ),
        )
        .await,
    )
    .await;
    assert_eq!(client_page["pattern"], json!("/clients/:id"));
    assert_eq!(client_page["access"], json!("authenticated"));
    assert_eq!(client_page["state"], json!("granted"));

    let unknown = send(
        &router,
        request(
            Method::GET,
            "/api/pages/access?path=/nowhere",
            Some(&operator),
            None,
        ),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn permissions_are_served_and_refreshed() {
    let router = test_router().await;
    let admin = login(&router, DEMO_ADMIN_EMAIL).await;

    for uri in ["/api/permissions", "/api/permissions?refresh=true"] {
        let body = json_body(send(&router, request(Method::GET, uri, Some(&admin), None)).await)
            .await;
        assert_eq!(
            body["granted"],
            json!([
                "settings.metrics.view",
                "settings.permissions.view",
                "settings.users.view"
            ])
        );
    }
}

#[tokio::test]
async fn logout_ends_the_session() {
    let router = test_router().await;
    let cookie = login(&router, DEMO_ADMIN_EMAIL).await;

    let logout = send(
        &router,
        request(Method::POST, "/auth/logout", Some(&cookie), Some(json!({}))),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let navigation = send(&router, request(Method::GET, "/api/navigation", Some(&cookie), None)).await;
    assert_eq!(navigation.status(), StatusCode::UNAUTHORIZED);
}
