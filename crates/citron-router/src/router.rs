//! Route table, grouped registration and request resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::filter::Filter;
use crate::handler::Handler;
use crate::method::Method;
use crate::params::PathParams;
use crate::reverse;
use crate::route::{Route, RouteId};
use crate::template::PathTemplate;

/// How [`Router::mount`] attaches group filters to the routes registered
/// inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupFilterMode {
    /// Filters reach only the routes registered at the group's own depth;
    /// routes registered inside nested sub-groups are skipped. This is the
    /// historical behavior and the default.
    #[default]
    CurrentDepth,
    /// Filters also reach routes registered inside nested sub-groups.
    Recursive,
}

/// A successful resolution: the winning route plus its captured params.
pub struct Match<'r> {
    /// The first route that matched structurally and survived its filters.
    pub route: &'r Route,
    /// The captures produced by the match, in template order.
    pub params: PathParams,
}

/// An ordered route table with grouped registration and first-match-wins
/// resolution.
///
/// Registration must complete before the first [`Router::resolve`] call;
/// resolution itself never mutates the table.
pub struct Router {
    routes: Vec<Route>,
    prefix_stack: Vec<String>,
    group_frames: Vec<Vec<RouteId>>,
    filter_mode: GroupFilterMode,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            prefix_stack: Vec::new(),
            group_frames: Vec::new(),
            filter_mode: GroupFilterMode::default(),
        }
    }

    /// Creates a router with an explicit group-filter attachment mode.
    pub fn with_filter_mode(filter_mode: GroupFilterMode) -> Self {
        Self {
            filter_mode,
            ..Self::new()
        }
    }

    /// Registers a route for `methods` under the currently active group
    /// prefix and returns it for builder-style configuration.
    ///
    /// # Errors
    ///
    /// [`RouterError::EmptyMethods`] for an empty method list and
    /// [`RouterError::InvalidPattern`] for a malformed template; both are
    /// surfaced here, at registration time.
    pub fn map(&mut self, methods: &[Method], pattern: &str, handler: Handler) -> Result<&mut Route> {
        let full = format!(
            "{}/{}",
            self.prefix_stack.concat(),
            pattern.trim_start_matches('/')
        );
        let template = PathTemplate::parse(&full)?;
        let route = Route::new(methods.to_vec(), template, handler)?;

        debug!(id = route.id(), template = route.template(), "registered route");

        if let Some(frame) = self.group_frames.last_mut() {
            frame.push(route.id());
        }

        self.routes.push(route);
        let last = self.routes.len() - 1;
        Ok(&mut self.routes[last])
    }

    /// Registers a GET route.
    ///
    /// # Errors
    ///
    /// See [`Router::map`].
    pub fn get(&mut self, pattern: &str, handler: Handler) -> Result<&mut Route> {
        self.map(&[Method::Get], pattern, handler)
    }

    /// Registers a POST route.
    ///
    /// # Errors
    ///
    /// See [`Router::map`].
    pub fn post(&mut self, pattern: &str, handler: Handler) -> Result<&mut Route> {
        self.map(&[Method::Post], pattern, handler)
    }

    /// Registers a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Router::map`].
    pub fn put(&mut self, pattern: &str, handler: Handler) -> Result<&mut Route> {
        self.map(&[Method::Put], pattern, handler)
    }

    /// Registers a PATCH route.
    ///
    /// # Errors
    ///
    /// See [`Router::map`].
    pub fn patch(&mut self, pattern: &str, handler: Handler) -> Result<&mut Route> {
        self.map(&[Method::Patch], pattern, handler)
    }

    /// Registers a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Router::map`].
    pub fn delete(&mut self, pattern: &str, handler: Handler) -> Result<&mut Route> {
        self.map(&[Method::Delete], pattern, handler)
    }

    /// Registers a route answering every supported method.
    ///
    /// # Errors
    ///
    /// See [`Router::map`].
    pub fn any(&mut self, pattern: &str, handler: Handler) -> Result<&mut Route> {
        self.map(&Method::ALL, pattern, handler)
    }

    /// Pushes a prefix frame. Subsequent registrations are prefixed with
    /// the concatenation of all live frames, in push order.
    pub fn push_group(&mut self, prefix: impl Into<String>) {
        self.prefix_stack.push(prefix.into());
    }

    /// Pops the innermost prefix frame.
    pub fn pop_group(&mut self) -> Option<String> {
        self.prefix_stack.pop()
    }

    /// Runs `body` one group level deeper, then attaches every filter in
    /// `filters` to the routes `body` registered, per the router's
    /// [`GroupFilterMode`].
    ///
    /// # Errors
    ///
    /// Propagates registration errors from `body`; no filters are attached
    /// when `body` fails.
    pub fn mount<F>(&mut self, body: F, filters: &[Filter]) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.group_frames.push(Vec::new());
        let outcome = body(self);
        let ids = self.group_frames.pop().unwrap_or_default();
        outcome?;

        for id in &ids {
            if let Some(route) = self.routes.iter_mut().find(|r| r.id() == *id) {
                for filter in filters {
                    route.push_filter(filter.clone());
                }
            }
        }

        if self.filter_mode == GroupFilterMode::Recursive {
            if let Some(parent) = self.group_frames.last_mut() {
                parent.extend(ids);
            }
        }

        Ok(())
    }

    /// Convenience wrapper: push `prefix`, mount `body` with `filters`, pop
    /// the prefix again.
    ///
    /// # Errors
    ///
    /// Propagates registration errors from `body`.
    pub fn group<F>(&mut self, prefix: &str, body: F, filters: &[Filter]) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.push_group(prefix);
        let outcome = self.mount(body, filters);
        self.pop_group();
        outcome
    }

    /// Resolves a request to the first route, in registration order, that
    /// matches structurally and survives its filter chain. Earlier routes
    /// always win over later, structurally-ambiguous ones.
    ///
    /// # Errors
    ///
    /// [`RouterError::NotFound`] once every candidate is exhausted (the
    /// host turns this into a not-found response), and pattern-compile
    /// errors from lazily compiled conditions.
    pub fn resolve(&self, method: Method, path: &str) -> Result<Match<'_>> {
        for route in &self.routes {
            if let Some(params) = route.match_path(method, path)? {
                debug!(
                    id = route.id(),
                    template = route.template(),
                    %method,
                    path,
                    "route matched"
                );
                return Ok(Match { route, params });
            }
        }

        Err(RouterError::NotFound {
            method: method.to_string(),
            path: path.to_string(),
        })
    }

    /// Generates a URL for a named route by substituting `data` into its
    /// template.
    ///
    /// The name view is rebuilt from the table on every call, so routes
    /// named after registration are always discoverable; when several
    /// routes share a name the last-registered one wins.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`] when no route carries `name`.
    pub fn url_for(&self, name: &str, data: &HashMap<String, String>) -> Result<String> {
        let route = self
            .routes
            .iter()
            .rev()
            .find(|r| r.route_name() == Some(name))
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;

        Ok(reverse::substitute(route.template(), data))
    }

    /// Read-only view of the table, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
