use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::can_view::{CanView, is_can_view_truthy};
use crate::menu_icon::MenuIcon;

/// Menu identifier as delivered by the backend, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuItemId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl Display for MenuItemId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<i64> for MenuItemId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MenuItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Menu descriptor record as received from the backend.
///
/// Fields the backend adds beyond the known ones are kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuItemDto {
    /// Stable identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MenuItemId>,
    /// Identifier of the containing item, absent for top-level items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuItemId>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Icon registry name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Route path, absent for pure grouping nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Tri-state view flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_view: Option<CanView>,
    /// Nested children in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItemDto>>,
    /// Unrecognized backend fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Menu entry after icon resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    id: Option<MenuItemId>,
    parent_id: Option<MenuItemId>,
    title: Option<String>,
    icon: MenuIcon,
    url: Option<String>,
    can_view: Option<CanView>,
    items: Option<Vec<MenuItem>>,
    extra: Map<String, Value>,
}

impl MenuItem {
    /// Returns the backend identifier.
    #[must_use]
    pub fn id(&self) -> Option<&MenuItemId> {
        self.id.as_ref()
    }

    /// Returns the parent identifier.
    #[must_use]
    pub fn parent_id(&self) -> Option<&MenuItemId> {
        self.parent_id.as_ref()
    }

    /// Returns the display label.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the resolved icon.
    #[must_use]
    pub fn icon(&self) -> MenuIcon {
        self.icon
    }

    /// Returns the route path.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the raw view flag.
    #[must_use]
    pub fn can_view(&self) -> Option<&CanView> {
        self.can_view.as_ref()
    }

    /// Returns whether the item's own flag grants visibility.
    #[must_use]
    pub fn is_viewable(&self) -> bool {
        is_can_view_truthy(self.can_view.as_ref())
    }

    /// Returns nested children, absent for leaf entries.
    #[must_use]
    pub fn items(&self) -> Option<&[MenuItem]> {
        self.items.as_deref()
    }

    /// Returns unrecognized backend fields.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Read access shared by descriptor and resolved menu trees.
pub trait MenuNode: Sized {
    /// Route path of the node.
    fn node_url(&self) -> Option<&str>;

    /// Children of the node.
    fn node_children(&self) -> Option<&[Self]>;
}

impl MenuNode for MenuItemDto {
    fn node_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn node_children(&self) -> Option<&[Self]> {
        self.items.as_deref()
    }
}

impl MenuNode for MenuItem {
    fn node_url(&self) -> Option<&str> {
        self.url()
    }

    fn node_children(&self) -> Option<&[Self]> {
        self.items()
    }
}

/// Resolves descriptor records into menu entries with concrete icons.
///
/// Tree shape and order are preserved; only the icon is substituted.
#[must_use]
pub fn resolve_menu(menu: &[MenuItemDto]) -> Vec<MenuItem> {
    menu.iter().map(resolve_item).collect()
}

fn resolve_item(item: &MenuItemDto) -> MenuItem {
    MenuItem {
        id: item.id.clone(),
        parent_id: item.parent_id.clone(),
        title: item.title.clone(),
        icon: MenuIcon::resolve(item.icon.as_deref()),
        url: item.url.clone(),
        can_view: item.can_view.clone(),
        items: item.items.as_deref().map(resolve_menu),
        extra: item.extra.clone(),
    }
}

/// Removes entries the user may not see.
///
/// Children are filtered first. An entry survives when its own flag is truthy
/// or when at least one child survived. Surviving entries with no surviving
/// children have their `items` cleared.
#[must_use]
pub fn filter_menu_by_view_access(menu: &[MenuItem]) -> Vec<MenuItem> {
    menu.iter().filter_map(filter_item).collect()
}

fn filter_item(item: &MenuItem) -> Option<MenuItem> {
    let filtered_items = item
        .items
        .as_deref()
        .map(filter_menu_by_view_access)
        .filter(|children| !children.is_empty());

    if !item.is_viewable() && filtered_items.is_none() {
        return None;
    }

    Some(MenuItem {
        items: filtered_items,
        ..item.clone_without_children()
    })
}

impl MenuItem {
    fn clone_without_children(&self) -> Self {
        Self {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            title: self.title.clone(),
            icon: self.icon,
            url: self.url.clone(),
            can_view: self.can_view.clone(),
            items: None,
            extra: self.extra.clone(),
        }
    }
}

/// Finds the first node whose url equals `url`, depth-first in display order.
#[must_use]
pub fn find_menu_item_by_url<'a, T: MenuNode>(menu: &'a [T], url: &str) -> Option<&'a T> {
    for item in menu {
        if item.node_url() == Some(url) {
            return Some(item);
        }

        if let Some(found) = item
            .node_children()
            .and_then(|children| find_menu_item_by_url(children, url))
        {
            return Some(found);
        }
    }

    None
}

#[cfg(test)]
mod tests;
