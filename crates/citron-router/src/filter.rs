//! Route filters: post-match hooks that can veto or rewrite captures.

use std::sync::Arc;

use crate::params::PathParams;
use crate::route::Route;

/// Decision returned by a filter.
pub enum FilterOutcome {
    /// Keep the current params and continue down the chain.
    Pass,
    /// Substitute a new params mapping and continue down the chain.
    Replace(PathParams),
    /// Treat the whole match as failed. The route reports no match and the
    /// scan moves on to the next candidate; this is normal control flow,
    /// not an error.
    Abort,
}

/// A shared filter callback.
///
/// Filters run in registration order after a structural match and receive
/// the captured params, the normalized request path and the route under
/// evaluation.
pub type Filter = Arc<dyn Fn(&PathParams, &str, &Route) -> FilterOutcome + Send + Sync>;

/// Wraps a closure into a [`Filter`] so it can be shared across the routes
/// of a group.
pub fn filter_fn<F>(f: F) -> Filter
where
    F: Fn(&PathParams, &str, &Route) -> FilterOutcome + Send + Sync + 'static,
{
    Arc::new(f)
}
