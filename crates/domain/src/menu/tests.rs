use proptest::prelude::*;
use serde_json::json;

use super::{
    MenuItem, MenuItemDto, MenuItemId, filter_menu_by_view_access, find_menu_item_by_url,
    resolve_menu,
};
use crate::{CanView, MenuIcon};

fn dto_list(value: serde_json::Value) -> Vec<MenuItemDto> {
    serde_json::from_value(value).unwrap_or_else(|_| unreachable!())
}

fn sample_menu() -> Vec<MenuItemDto> {
    dto_list(json!([
        {"id": 1, "title": "Dashboard", "icon": "Home", "url": "/", "can_view": true},
        {"id": 2, "title": "Clients", "icon": "Users", "url": "/clients", "can_view": "1"},
        {
            "id": 3,
            "title": "Settings",
            "icon": "Settings",
            "can_view": 0,
            "items": [
                {"id": 4, "parent_id": 3, "title": "Permissions", "icon": "Lock", "url": "/settings/permissions", "can_view": "0"},
                {"id": 5, "parent_id": 3, "title": "Users", "icon": "Users", "url": "/settings/users", "can_view": 1},
                {"id": 6, "parent_id": 3, "title": "Metrics", "url": "/settings/metrics"}
            ]
        }
    ]))
}

fn ids(menu: &[MenuItem]) -> Vec<String> {
    menu.iter()
        .map(|item| item.id().map(ToString::to_string).unwrap_or_default())
        .collect()
}

fn count_nodes(menu: &[MenuItem]) -> usize {
    menu.iter()
        .map(|item| 1 + item.items().map(count_nodes).unwrap_or(0))
        .sum()
}

fn count_dto_nodes(menu: &[MenuItemDto]) -> usize {
    menu.iter()
        .map(|item| 1 + item.items.as_deref().map(count_dto_nodes).unwrap_or(0))
        .sum()
}

fn depth(menu: &[MenuItem]) -> usize {
    menu.iter()
        .map(|item| 1 + item.items().map(depth).unwrap_or(0))
        .max()
        .unwrap_or(0)
}

fn dto_depth(menu: &[MenuItemDto]) -> usize {
    menu.iter()
        .map(|item| 1 + item.items.as_deref().map(dto_depth).unwrap_or(0))
        .max()
        .unwrap_or(0)
}

#[test]
fn resolve_substitutes_icons_and_keeps_shape() {
    let menu = sample_menu();
    let resolved = resolve_menu(&menu);

    assert_eq!(ids(&resolved), vec!["1", "2", "3"]);
    assert_eq!(resolved[0].icon(), MenuIcon::Home);
    assert_eq!(resolved[2].icon(), MenuIcon::Settings);

    let children = resolved[2].items().unwrap_or_default();
    assert_eq!(ids(children), vec!["4", "5", "6"]);
    assert_eq!(children[0].icon(), MenuIcon::FileText);
    assert_eq!(children[1].icon(), MenuIcon::Users);
    assert_eq!(children[2].icon(), MenuIcon::FileText);
    assert_eq!(children[0].parent_id(), Some(&MenuItemId::Number(3)));
}

#[test]
fn resolve_does_not_mutate_input() {
    let menu = sample_menu();
    let snapshot = menu.clone();
    let _ = resolve_menu(&menu);
    assert_eq!(menu, snapshot);
}

#[test]
fn resolve_passes_malformed_records_through() {
    let menu = dto_list(json!([{"label": "orphan"}]));
    let resolved = resolve_menu(&menu);

    assert_eq!(resolved.len(), 1);
    assert!(resolved[0].id().is_none());
    assert_eq!(resolved[0].icon(), MenuIcon::FileText);
    assert_eq!(resolved[0].extra().get("label"), Some(&json!("orphan")));
}

#[test]
fn parent_hidden_but_child_visible_is_retained() {
    let menu = dto_list(json!([{"id": 1, "can_view": false, "items": [{"id": 2, "can_view": "1"}]}]));
    let filtered = filter_menu_by_view_access(&resolve_menu(&menu));

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].can_view(), Some(&CanView::Bool(false)));
    let children = filtered[0].items().unwrap_or_default();
    assert_eq!(ids(children), vec!["2"]);
    assert_eq!(children[0].can_view(), Some(&CanView::from("1")));
}

#[test]
fn parent_and_children_hidden_are_removed() {
    let menu = dto_list(json!([{"id": 1, "can_view": "0", "items": [{"id": 2, "can_view": 0}]}]));
    let filtered = filter_menu_by_view_access(&resolve_menu(&menu));

    assert!(filtered.is_empty());
}

#[test]
fn visible_parent_with_hidden_children_has_items_cleared() {
    let menu = dto_list(json!([{"id": 1, "can_view": 1, "items": [{"id": 2, "can_view": "true"}]}]));
    let filtered = filter_menu_by_view_access(&resolve_menu(&menu));

    assert_eq!(filtered.len(), 1);
    assert!(filtered[0].items().is_none());
}

#[test]
fn visible_parent_with_empty_items_has_items_cleared() {
    let menu = dto_list(json!([{"id": 1, "can_view": true, "items": []}]));
    let filtered = filter_menu_by_view_access(&resolve_menu(&menu));

    assert_eq!(filtered.len(), 1);
    assert!(filtered[0].items().is_none());
}

#[test]
fn node_without_flag_or_children_is_dropped() {
    let menu = dto_list(json!([{"id": 1, "url": "/orphan"}, {"id": 2, "can_view": true}]));
    let filtered = filter_menu_by_view_access(&resolve_menu(&menu));

    assert_eq!(ids(&filtered), vec!["2"]);
}

#[test]
fn filter_keeps_sibling_order() {
    let filtered = filter_menu_by_view_access(&resolve_menu(&sample_menu()));

    assert_eq!(ids(&filtered), vec!["1", "2", "3"]);
    assert_eq!(ids(filtered[2].items().unwrap_or_default()), vec!["5"]);
}

#[test]
fn find_by_url_is_depth_first_and_first_match_wins() {
    let menu = dto_list(json!([
        {"id": 1, "items": [{"id": 2, "url": "/shared"}]},
        {"id": 3, "url": "/shared"}
    ]));
    let resolved = resolve_menu(&menu);

    let found = find_menu_item_by_url(&resolved, "/shared");
    assert_eq!(found.and_then(MenuItem::id), Some(&MenuItemId::Number(2)));
    assert!(find_menu_item_by_url(&resolved, "/missing").is_none());
}

#[test]
fn find_by_url_works_on_descriptors() {
    let menu = sample_menu();
    let found = find_menu_item_by_url(&menu, "/settings/users");
    assert_eq!(found.and_then(|item| item.title.as_deref()), Some("Users"));
}

#[test]
fn descriptor_serialization_keeps_unknown_fields() {
    let raw = json!([{"id": "a", "title": "Products", "icon": "Package", "url": "/products", "can_view": "1", "badge": 3}]);
    let menu = dto_list(raw.clone());
    let serialized = serde_json::to_value(&menu).unwrap_or_default();
    assert_eq!(serialized, raw);
}

#[test]
fn descriptor_serialization_omits_absent_parent() {
    let raw = json!([
        {"id": 1, "title": "Settings"},
        {"id": 2, "parent_id": 1, "title": "Users"}
    ]);
    let serialized = serde_json::to_value(dto_list(raw.clone())).unwrap_or_default();
    assert_eq!(serialized, raw);
}

fn can_view_strategy() -> impl Strategy<Value = Option<serde_json::Value>> {
    prop_oneof![
        Just(None),
        Just(Some(json!(null))),
        any::<bool>().prop_map(|value| Some(json!(value))),
        (-2i64..4).prop_map(|value| Some(json!(value))),
        prop_oneof![Just("0"), Just("1"), Just("true"), Just("")]
            .prop_map(|value| Some(json!(value))),
    ]
}

fn icon_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("Home".to_owned())),
        Just(Some("BarChart3".to_owned())),
        "[a-zA-Z]{0,8}".prop_map(Some),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = serde_json::Value> {
    (0i64..1000, icon_strategy(), can_view_strategy()).prop_map(|(id, icon, can_view)| {
        let mut node = json!({"id": id});
        if let Some(icon) = icon {
            node["icon"] = json!(icon);
        }
        if let Some(can_view) = can_view {
            node["can_view"] = can_view;
        }
        node
    })
}

fn tree_strategy() -> impl Strategy<Value = Vec<MenuItemDto>> {
    let node = leaf_strategy().prop_recursive(4, 48, 5, |inner| {
        (leaf_strategy(), proptest::collection::vec(inner, 0..5)).prop_map(|(mut node, items)| {
            node["items"] = json!(items);
            node
        })
    });

    proptest::collection::vec(node, 0..6).prop_map(|nodes| dto_list(json!(nodes)))
}

fn assert_filtered_invariants(menu: &[MenuItem]) {
    for item in menu {
        match item.items() {
            Some(children) => {
                assert!(!children.is_empty());
                assert_filtered_invariants(children);
            }
            None => assert!(item.is_viewable()),
        }
    }
}

proptest! {
    #[test]
    fn resolve_preserves_count_order_and_depth(menu in tree_strategy()) {
        let resolved = resolve_menu(&menu);
        prop_assert_eq!(count_nodes(&resolved), count_dto_nodes(&menu));
        prop_assert_eq!(depth(&resolved), dto_depth(&menu));
        let expected: Vec<String> = menu
            .iter()
            .map(|item| item.id.as_ref().map(ToString::to_string).unwrap_or_default())
            .collect();
        prop_assert_eq!(ids(&resolved), expected);
    }

    #[test]
    fn unregistered_icon_names_resolve_to_default(name in "[a-z0-9 ]{0,12}") {
        let menu = vec![MenuItemDto { icon: Some(name), ..MenuItemDto::default() }];
        prop_assert_eq!(resolve_menu(&menu)[0].icon(), MenuIcon::DEFAULT);
    }

    #[test]
    fn filtered_tree_only_keeps_visible_paths(menu in tree_strategy()) {
        let filtered = filter_menu_by_view_access(&resolve_menu(&menu));
        assert_filtered_invariants(&filtered);
    }

    #[test]
    fn filtering_is_idempotent(menu in tree_strategy()) {
        let once = filter_menu_by_view_access(&resolve_menu(&menu));
        let twice = filter_menu_by_view_access(&once);
        prop_assert_eq!(once, twice);
    }
}
