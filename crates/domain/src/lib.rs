//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod can_view;
mod dashboard;
mod menu;
mod menu_icon;
mod route_guard;
mod route_table;
mod security;

pub use can_view::{CanView, is_can_view_truthy};
pub use dashboard::{
    CreateDashboardMetricInput, DashboardMetricRecord, DashboardMetricsListParams,
    UpdateDashboardMetricInput,
};
pub use menu::{
    MenuItem, MenuItemDto, MenuItemId, MenuNode, filter_menu_by_view_access,
    find_menu_item_by_url, resolve_menu,
};
pub use menu_icon::MenuIcon;
pub use route_guard::{AccessDecision, DenialReason, GuardState, RouteGuard, evaluate_access};
pub use route_table::{PageAccess, PageRoute, RouteTable};
pub use security::{PermissionKey, PermissionSet};
