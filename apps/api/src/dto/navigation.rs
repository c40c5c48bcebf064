use bizdesk_domain::{MenuItem, MenuItemId};
use serde::Serialize;
use serde_json::{Map, Value};
use ts_rs::TS;

/// Resolved menu entry with its icon name and normalized visibility flag.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-item-response.ts"
)]
pub struct MenuItemResponse {
    #[ts(type = "number | string | null")]
    pub id: Option<Value>,
    #[ts(type = "number | string | null")]
    pub parent_id: Option<Value>,
    pub title: Option<String>,
    pub icon: String,
    pub url: Option<String>,
    pub can_view: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub items: Option<Vec<MenuItemResponse>>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id().map(id_value),
            parent_id: item.parent_id().map(id_value),
            title: item.title().map(ToOwned::to_owned),
            icon: item.icon().as_str().to_owned(),
            url: item.url().map(ToOwned::to_owned),
            can_view: item.is_viewable(),
            items: item
                .items()
                .map(|children| children.iter().map(Self::from).collect()),
            extra: item.extra().clone(),
        }
    }
}

impl MenuItemResponse {
    pub fn from_tree(items: &[MenuItem]) -> Vec<Self> {
        items.iter().map(Self::from).collect()
    }
}

fn id_value(id: &MenuItemId) -> Value {
    match id {
        MenuItemId::Number(value) => Value::from(*value),
        MenuItemId::Text(value) => Value::String(value.clone()),
    }
}
