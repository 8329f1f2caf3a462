//! A single route: one compiled matcher, a filter chain and a bound handler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::trace;

use crate::error::{Result, RouterError};
use crate::filter::{Filter, FilterOutcome};
use crate::handler::{Handler, HandlerFactory};
use crate::method::Method;
use crate::params::PathParams;
use crate::template::{CompiledTemplate, PathTemplate};

/// Route identifier, unique and strictly increasing for the lifetime of the
/// process. Ids are never reused.
pub type RouteId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A single route definition.
///
/// Created through [`crate::Router::map`] and configured builder-style:
///
/// ```ignore
/// router
///     .get("/post/<pid>", handler)?
///     .name("post-page")
///     .conditions([("pid", "[0-9]+")])
///     .filter(|params, _path, _route| FilterOutcome::Pass);
/// ```
pub struct Route {
    id: RouteId,
    name: Option<String>,
    methods: Vec<Method>,
    template: PathTemplate,
    handler: Handler,
    conditions: HashMap<String, String>,
    filters: Vec<Filter>,
    matcher: OnceLock<std::result::Result<CompiledTemplate, regex::Error>>,
}

impl Route {
    pub(crate) fn new(methods: Vec<Method>, template: PathTemplate, handler: Handler) -> Result<Self> {
        if methods.is_empty() {
            return Err(RouterError::EmptyMethods);
        }

        Ok(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            name: None,
            methods,
            template,
            handler,
            conditions: HashMap::new(),
            filters: Vec::new(),
            matcher: OnceLock::new(),
        })
    }

    /// The route's identifier.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The normalized template the route was registered with, group prefix
    /// included.
    pub fn template(&self) -> &str {
        self.template.template()
    }

    /// The HTTP methods this route answers.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The route's name, if one was set.
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the route supports `method`.
    pub fn supports(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// Names the route for reverse URL lookup. Callable multiple times; the
    /// last name wins.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Merges per-placeholder capture overrides; later calls overwrite
    /// earlier entries with the same key. Invalidates any already-compiled
    /// matcher so the overrides always take effect.
    pub fn conditions<I, K, V>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.conditions
            .extend(conditions.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.matcher.take();
        self
    }

    /// Appends a filter; the chain runs in call order.
    pub fn filter<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&PathParams, &str, &Route) -> FilterOutcome + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(f));
        self
    }

    pub(crate) fn push_filter(&mut self, f: Filter) {
        self.filters.push(f);
    }

    /// Compile-once, reuse thereafter. Compiling is idempotent, so a
    /// concurrent first use at worst duplicates work.
    fn matcher(&self) -> Result<&CompiledTemplate> {
        match self.matcher.get_or_init(|| self.template.compile(&self.conditions)) {
            Ok(matcher) => Ok(matcher),
            Err(e) => Err(RouterError::PatternCompile {
                pattern: self.template.template().to_string(),
                source: e.clone(),
            }),
        }
    }

    /// Tests the route against a request, returning the captured params on
    /// success.
    ///
    /// A method miss, a structural miss and a filter abort all yield
    /// `Ok(None)`, telling the caller to move on to the next candidate.
    ///
    /// # Errors
    ///
    /// Only when a caller-supplied condition fails to compile; template
    /// structure errors were already rejected at registration.
    pub fn match_path(&self, method: Method, path: &str) -> Result<Option<PathParams>> {
        if !self.supports(method) {
            return Ok(None);
        }

        let path = normalize_path(path);
        let Some(mut params) = self.matcher()?.match_path(&path) else {
            return Ok(None);
        };

        for filter in &self.filters {
            match filter(&params, &path, self) {
                FilterOutcome::Pass => {}
                FilterOutcome::Replace(next) => params = next,
                FilterOutcome::Abort => {
                    trace!(template = self.template.template(), "filter aborted match");
                    return Ok(None);
                }
            }
        }

        Ok(Some(params))
    }

    /// Invokes the bound handler with the values of `params` in capture
    /// order.
    ///
    /// # Errors
    ///
    /// For `Type.Method` handlers, factory errors (including
    /// [`RouterError::UndefinedMethod`]) propagate unchanged.
    pub fn dispatch(&self, params: &PathParams, factory: &dyn HandlerFactory) -> Result<Value> {
        let args: Vec<&str> = params.values().collect();
        match &self.handler {
            Handler::Func(f) => Ok(f(&args)),
            Handler::TypeMethod { type_name, method } => {
                factory.dispatch(type_name, method, &args)
            }
        }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("template", &self.template.template())
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

/// Normalizes a request path to exactly one leading separator and no
/// trailing one.
fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}
