use std::sync::Arc;

use bizdesk_core::{AccessToken, AppError, AppResult};
use bizdesk_domain::{MenuItem, filter_menu_by_view_access, find_menu_item_by_url, resolve_menu};
use tracing::debug;

use crate::auth_context::AuthContext;
use crate::backend_ports::MenuSource;

/// Resolved menu together with its visible subset.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTree {
    /// Every entry, icons resolved, nothing pruned.
    pub resolved: Vec<MenuItem>,
    /// Entries the user may see.
    pub visible: Vec<MenuItem>,
}

/// Application service building navigation trees from backend descriptors.
#[derive(Clone)]
pub struct NavigationService {
    menu_source: Arc<dyn MenuSource>,
}

impl NavigationService {
    /// Creates a navigation service.
    #[must_use]
    pub fn new(menu_source: Arc<dyn MenuSource>) -> Self {
        Self { menu_source }
    }

    /// Fetches descriptors and resolves icons without pruning.
    pub async fn resolved_menu(&self, token: &AccessToken) -> AppResult<Vec<MenuItem>> {
        let descriptors = self.menu_source.fetch_menu(token).await?;
        Ok(resolve_menu(&descriptors))
    }

    /// Builds the navigation tree for the session.
    pub async fn navigation(&self, context: &AuthContext) -> AppResult<NavigationTree> {
        let token = require_token(context)?;
        let resolved = self.resolved_menu(token).await?;
        let visible = filter_menu_by_view_access(&resolved);

        debug!(
            resolved_roots = resolved.len(),
            visible_roots = visible.len(),
            "built navigation tree"
        );

        Ok(NavigationTree { resolved, visible })
    }

    /// Finds the unfiltered menu entry linking to `url`.
    pub async fn menu_item_for_url(
        &self,
        context: &AuthContext,
        url: &str,
    ) -> AppResult<Option<MenuItem>> {
        let token = require_token(context)?;
        let resolved = self.resolved_menu(token).await?;
        Ok(find_menu_item_by_url(&resolved, url).cloned())
    }
}

pub(crate) fn require_token(context: &AuthContext) -> AppResult<&AccessToken> {
    context
        .token()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
}
