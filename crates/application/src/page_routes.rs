use bizdesk_core::AppResult;
use bizdesk_domain::{PageAccess, PageRoute, PermissionKey, RouteGuard, RouteTable};

/// Permission required by the permissions settings page.
pub const SETTINGS_PERMISSIONS_VIEW: &str = "settings.permissions.view";
/// Permission required by the metrics settings page.
pub const SETTINGS_METRICS_VIEW: &str = "settings.metrics.view";

/// Guard of the permissions settings page.
pub fn settings_permissions_guard() -> AppResult<RouteGuard> {
    Ok(RouteGuard::new()
        .with_required(PermissionKey::new(SETTINGS_PERMISSIONS_VIEW)?)
        .with_menu_path("/settings/permissions")
        .with_require_remote(false))
}

/// Guard of the users settings page.
#[must_use]
pub fn settings_users_guard() -> RouteGuard {
    RouteGuard::new()
        .with_menu_path("/settings/users")
        .with_require_remote(false)
}

/// Guard of the metrics settings page.
pub fn settings_metrics_guard() -> AppResult<RouteGuard> {
    Ok(RouteGuard::new().with_required(PermissionKey::new(SETTINGS_METRICS_VIEW)?))
}

/// Pages of the business front-end and their access rules.
pub fn standard_route_table() -> AppResult<RouteTable> {
    RouteTable::new(vec![
        PageRoute::new("/login", PageAccess::Public)?,
        PageRoute::new("/register", PageAccess::Public)?,
        PageRoute::new("/forgot-password", PageAccess::Public)?,
        PageRoute::new("/reset-password", PageAccess::Public)?,
        PageRoute::new("/", PageAccess::Authenticated)?,
        PageRoute::new("/clients", PageAccess::Authenticated)?,
        PageRoute::new("/clients/:id", PageAccess::Authenticated)?,
        PageRoute::new("/service-objects", PageAccess::Authenticated)?,
        PageRoute::new("/products", PageAccess::Authenticated)?,
        PageRoute::new(
            "/settings/permissions",
            PageAccess::Guarded(settings_permissions_guard()?),
        )?,
        PageRoute::new("/settings/users", PageAccess::Guarded(settings_users_guard()))?,
        PageRoute::new(
            "/settings/metrics",
            PageAccess::Guarded(settings_metrics_guard()?),
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use bizdesk_domain::{PageAccess, PageRoute};

    use super::standard_route_table;

    #[test]
    fn standard_table_builds_and_guards_settings_pages() {
        let table = standard_route_table();
        assert!(table.is_ok());
        let table = table.unwrap_or_else(|_| unreachable!());

        let users = table.match_path("/settings/users").map(PageRoute::access);
        match users {
            Some(PageAccess::Guarded(rule)) => {
                assert_eq!(rule.menu_path(), Some("/settings/users"));
                assert!(rule.required().is_none());
                assert!(!rule.require_remote());
            }
            other => panic!("unexpected access for users page: {other:?}"),
        }

        let metrics = table.match_path("/settings/metrics").map(PageRoute::access);
        match metrics {
            Some(PageAccess::Guarded(rule)) => {
                assert!(rule.require_remote());
                assert!(rule.menu_path().is_none());
            }
            other => panic!("unexpected access for metrics page: {other:?}"),
        }

        assert_eq!(
            table.match_path("/login").map(PageRoute::access),
            Some(&PageAccess::Public)
        );
        assert_eq!(
            table.match_path("/clients/abc").map(PageRoute::access),
            Some(&PageAccess::Authenticated)
        );
    }
}
