use std::collections::HashSet;

use bizdesk_core::{AppError, AppResult};

use crate::route_guard::RouteGuard;

/// Access level required to serve a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAccess {
    /// Served without a session.
    Public,
    /// Served to any authenticated session.
    Authenticated,
    /// Served to an authenticated session that passes the guard.
    Guarded(RouteGuard),
}

/// One page of the front-end router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pattern: String,
    access: PageAccess,
}

impl PageRoute {
    /// Creates a page route. Segments starting with `:` match any value.
    pub fn new(pattern: impl Into<String>, access: PageAccess) -> AppResult<Self> {
        let pattern = normalize_path(pattern.into().as_str());
        if !pattern.starts_with('/') {
            return Err(AppError::Validation(format!(
                "route pattern '{pattern}' must start with '/'"
            )));
        }

        if segments(&pattern).any(|segment| segment == ":") {
            return Err(AppError::Validation(format!(
                "route pattern '{pattern}' has an unnamed parameter"
            )));
        }

        Ok(Self { pattern, access })
    }

    /// Returns the route pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the access level.
    #[must_use]
    pub fn access(&self) -> &PageAccess {
        &self.access
    }

    fn matches(&self, path: &str) -> bool {
        let mut pattern_segments = segments(&self.pattern);
        let mut path_segments = segments(path);

        loop {
            match (pattern_segments.next(), path_segments.next()) {
                (None, None) => return true,
                (Some(expected), Some(actual)) => {
                    if !expected.starts_with(':') && expected != actual {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

/// Ordered page routes; the first matching pattern wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<PageRoute>,
}

impl RouteTable {
    /// Creates a route table, rejecting duplicate patterns.
    pub fn new(routes: Vec<PageRoute>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert(route.pattern.as_str()) {
                return Err(AppError::Conflict(format!(
                    "route pattern '{}' is declared twice",
                    route.pattern
                )));
            }
        }

        Ok(Self { routes })
    }

    /// Finds the route serving `path`. Query strings and trailing slashes are ignored.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<&PageRoute> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = normalize_path(path);
        self.routes.iter().find(|route| route.matches(&path))
    }

    /// Returns all routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[PageRoute] {
        &self.routes
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.len() > 1 {
        trimmed.trim_end_matches('/').to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
