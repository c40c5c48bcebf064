use std::collections::HashMap;

use bizdesk_core::{AppError, AppResult};
use bizdesk_domain::{MenuItemDto, MenuItemId};
use serde_json::Value;

const ENVELOPE_KEYS: [&str; 3] = ["data", "items", "menu"];

/// Deepest nesting a stitched menu may reach, counted from the top level.
pub(super) const MAX_MENU_DEPTH: usize = 64;

/// Reads the descriptor list from a bare array or a `{ "data": [...] }` style envelope.
pub(super) fn menu_descriptors_from_payload(payload: Value) -> AppResult<Vec<MenuItemDto>> {
    let list = match payload {
        Value::Array(_) => payload,
        Value::Object(mut object) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| object.remove(*key).filter(Value::is_array))
            .ok_or_else(|| {
                AppError::Unavailable("backend menu payload carries no item list".to_owned())
            })?,
        other => {
            return Err(AppError::Unavailable(format!(
                "backend menu payload must be a list, got {other}"
            )));
        }
    };

    serde_json::from_value(list).map_err(|error| {
        AppError::Unavailable(format!("backend menu payload is malformed: {error}"))
    })
}

/// Nests a flat `parent_id` list under its parents.
///
/// Lists that already carry `items`, or carry no `parent_id` at all, are
/// returned untouched. Sibling order follows delivery order. A record whose
/// parent is unknown stays at the top level; a record only reachable through a
/// cycle is promoted to the top level, and the back edge closing the cycle is
/// dropped. Chains deeper than [`MAX_MENU_DEPTH`] are rejected.
pub(super) fn nest_flat_menu(items: Vec<MenuItemDto>) -> AppResult<Vec<MenuItemDto>> {
    let already_nested = items.iter().any(|item| item.items.is_some());
    let has_parents = items.iter().any(|item| item.parent_id.is_some());
    if already_nested || !has_parents {
        return Ok(items);
    }

    let mut positions: HashMap<&MenuItemId, usize> = HashMap::new();
    for (index, item) in items.iter().enumerate() {
        if let Some(id) = item.id.as_ref() {
            positions.entry(id).or_insert(index);
        }
    }

    let mut children = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let parent = item
            .parent_id
            .as_ref()
            .and_then(|parent_id| positions.get(parent_id))
            .copied();

        match parent {
            Some(parent) if parent != index => children[parent].push(index),
            _ => roots.push(index),
        }
    }

    let mut slots: Vec<Option<MenuItemDto>> = items.into_iter().map(Some).collect();
    let mut visited = vec![false; slots.len()];
    let mut nested = Vec::with_capacity(roots.len());

    for root in roots {
        if let Some(node) = build_node(root, 1, &children, &mut slots, &mut visited)? {
            nested.push(node);
        }
    }

    for index in 0..slots.len() {
        if let Some(node) = build_node(index, 1, &children, &mut slots, &mut visited)? {
            nested.push(node);
        }
    }

    Ok(nested)
}

fn build_node(
    index: usize,
    depth: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<MenuItemDto>],
    visited: &mut [bool],
) -> AppResult<Option<MenuItemDto>> {
    if visited[index] {
        return Ok(None);
    }
    if depth > MAX_MENU_DEPTH {
        return Err(AppError::Unavailable("backend menu nesting too deep".to_owned()));
    }
    visited[index] = true;

    let Some(mut node) = slots[index].take() else {
        return Ok(None);
    };

    let mut nested_children = Vec::with_capacity(children[index].len());
    for child in &children[index] {
        if let Some(child) = build_node(*child, depth + 1, children, slots, visited)? {
            nested_children.push(child);
        }
    }

    if !nested_children.is_empty() {
        node.items = Some(nested_children);
    }

    Ok(Some(node))
}
