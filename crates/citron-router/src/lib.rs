//! # citron-router
//!
//! Route-pattern compilation, first-match-wins dispatch and reverse URL
//! generation.
//!
//! This crate provides:
//! - Path templates with `<name>` placeholders and nestable `(...)`
//!   optional groups, compiled to anchored matchers
//! - Per-placeholder capture overrides (conditions)
//! - Ordered filter chains that can veto or rewrite a match
//! - Grouped registration with prefix stacking and batch filter attachment
//! - Named routes for reverse URL generation
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::HashMap;
//!
//! use citron_router::{Handler, Method, Router};
//! use serde_json::json;
//!
//! let mut router = Router::new();
//!
//! router
//!     .get("/post/<pid>", Handler::func(|args| json!({ "pid": args[0] })))
//!     .unwrap()
//!     .name("post-page")
//!     .conditions([("pid", "[0-9]+")]);
//!
//! let matched = router.resolve(Method::Get, "/post/42").unwrap();
//! assert_eq!(matched.params.get("pid"), Some("42"));
//!
//! let data = HashMap::from([("pid".to_string(), "42".to_string())]);
//! assert_eq!(router.url_for("post-page", &data).unwrap(), "/post/42");
//! ```
//!
//! ## Path Templates
//!
//! Templates contain literal text, placeholders and optional groups:
//!
//! ```ignore
//! router.get("/post/<pid>", handler)?;          // required placeholder
//! router.get("/hello(/<name>)", handler)?;      // optional tail segment
//! router.get("/archive(/<y>(/<m>))", handler)?; // groups may nest
//! ```
//!
//! A placeholder captures everything up to the next separator or URL
//! delimiter. Malformed templates (unbalanced groups, bad placeholder
//! names) are rejected at registration, never at request time.
//!
//! ## Conditions
//!
//! A condition replaces the default capture class for one placeholder:
//!
//! ```ignore
//! router.get("/post/<pid>", handler)?.conditions([("pid", "[0-9]+")]);
//! ```
//!
//! ## Filters
//!
//! Filters run after a structural match, in registration order. Each one
//! can pass the captures through, replace them, or abort the match, in
//! which case the scan simply continues with the next route:
//!
//! ```ignore
//! router.get("/post/<pid>", handler)?.filter(|params, _path, _route| {
//!     if params.get("pid") == Some("0") {
//!         FilterOutcome::Abort
//!     } else {
//!         FilterOutcome::Pass
//!     }
//! });
//! ```
//!
//! ## Groups
//!
//! Groups prefix the templates registered inside them and can attach
//! filters to those routes in one go:
//!
//! ```ignore
//! router.group("/api/v1", |r| {
//!     r.get("/users", list_users)?;
//!     r.get("/users/<id>", get_user)?;
//!     Ok(())
//! }, &[filter_fn(require_token)])?;
//! ```
//!
//! By default group filters reach only the routes registered at the
//! group's own depth, not those inside nested sub-groups; see
//! [`GroupFilterMode`] for the recursive alternative.
//!
//! ## Dispatch
//!
//! A resolved [`Match`] carries the route and its captures as a value; the
//! route never stores match state, so a shared router is safe to resolve
//! against concurrently. Handlers are either closures or `Type.Method`
//! references resolved through the host's [`HandlerFactory`]:
//!
//! ```ignore
//! let matched = router.resolve(method, path)?;
//! let result = matched.route.dispatch(&matched.params, &factory)?;
//! ```

mod error;
mod filter;
mod handler;
mod method;
mod params;
mod reverse;
mod route;
mod router;
mod template;

pub use error::{Result, RouterError};
pub use filter::{filter_fn, Filter, FilterOutcome};
pub use handler::{Handler, HandlerFactory, HandlerFn};
pub use method::Method;
pub use params::PathParams;
pub use route::{Route, RouteId};
pub use router::{GroupFilterMode, Match, Router};
pub use template::{CompiledTemplate, PathTemplate};
