use bizdesk_application::{SETTINGS_METRICS_VIEW, SETTINGS_PERMISSIONS_VIEW};
use bizdesk_core::AppError;
use bizdesk_domain::{DashboardMetricRecord, MenuItemDto, PermissionKey, PermissionSet};
use bizdesk_infrastructure::{InMemoryAccount, InMemoryBackend};
use chrono::Utc;
use serde_json::{Value, json};

pub const DEMO_ADMIN_EMAIL: &str = "admin@bizdesk.local";
pub const DEMO_OPERATOR_EMAIL: &str = "operator@bizdesk.local";
pub const DEMO_PASSWORD: &str = "bizdesk-demo";

const ADMIN_USER_ID: &str = "1";
const OPERATOR_USER_ID: &str = "2";

/// Seeds the in-memory backend with an administrator, a restricted operator
/// and a few dashboard metrics.
pub async fn seed_demo_backend(backend: &InMemoryBackend) -> Result<(), AppError> {
    backend
        .add_account(InMemoryAccount {
            user_id: ADMIN_USER_ID.to_owned(),
            display_name: "Administrator".to_owned(),
            email: DEMO_ADMIN_EMAIL.to_owned(),
            password: DEMO_PASSWORD.to_owned(),
        })
        .await?;
    backend
        .add_account(InMemoryAccount {
            user_id: OPERATOR_USER_ID.to_owned(),
            display_name: "Operator".to_owned(),
            email: DEMO_OPERATOR_EMAIL.to_owned(),
            password: DEMO_PASSWORD.to_owned(),
        })
        .await?;

    backend.set_default_menu(demo_menu(false)?).await;
    backend.set_user_menu(ADMIN_USER_ID, demo_menu(true)?).await;

    let mut admin_permissions = PermissionSet::new();
    for key in [SETTINGS_PERMISSIONS_VIEW, SETTINGS_METRICS_VIEW, "settings.users.view"] {
        admin_permissions.insert(PermissionKey::new(key)?, true);
    }
    backend
        .set_permissions(ADMIN_USER_ID, admin_permissions)
        .await;

    let mut operator_permissions = PermissionSet::new();
    operator_permissions.insert(PermissionKey::new(SETTINGS_METRICS_VIEW)?, false);
    backend
        .set_permissions(OPERATOR_USER_ID, operator_permissions)
        .await;

    for (id, period, investment, visitors) in [
        ("metric-2025-01", "2025-01-31", 4200.0, 1830),
        ("metric-2025-02", "2025-02-28", 3900.0, 1710),
        ("metric-2025-03", "2025-03-31", 4650.0, 2044),
    ] {
        let now = Utc::now();
        backend
            .insert_metric(DashboardMetricRecord {
                id: id.to_owned(),
                user_id: ADMIN_USER_ID.to_owned(),
                period: period.to_owned(),
                investment,
                visitors,
                bot_conversations: visitors / 10,
                human_conversations: visitors / 40,
                proposals: visitors / 120,
                closed_deals: visitors / 400,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    Ok(())
}

fn demo_menu(settings_visible: bool) -> Result<Vec<MenuItemDto>, AppError> {
    let settings_flag: Value = if settings_visible { json!(1) } else { json!("0") };

    serde_json::from_value(json!([
        {"id": 1, "title": "Dashboard", "icon": "Home", "url": "/", "can_view": true},
        {"id": 2, "title": "Clients", "icon": "Users", "url": "/clients", "can_view": 1},
        {"id": 3, "title": "Service objects", "icon": "Wrench", "url": "/service-objects", "can_view": "1"},
        {"id": 4, "title": "Products", "icon": "Package", "url": "/products", "can_view": 1},
        {"id": 5, "title": "Settings", "icon": "Settings", "items": [
            {"id": 6, "parent_id": 5, "title": "Users", "icon": "Users", "url": "/settings/users", "can_view": settings_flag},
            {"id": 7, "parent_id": 5, "title": "Permissions", "icon": "ClipboardList", "url": "/settings/permissions", "can_view": settings_flag},
            {"id": 8, "parent_id": 5, "title": "Metrics", "icon": "BarChart3", "url": "/settings/metrics", "can_view": settings_flag}
        ]}
    ]))
    .map_err(|error| AppError::Internal(format!("invalid demo menu: {error}")))
}
