//! Route handlers and the dispatch seam towards the host.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;

/// A boxed handler function, invoked with the captured parameter values in
/// template order.
pub type HandlerFn = Arc<dyn Fn(&[&str]) -> Value + Send + Sync>;

/// The two handler shapes a route can bind.
#[derive(Clone)]
pub enum Handler {
    /// A directly-invocable function.
    Func(HandlerFn),
    /// A `Type.Method` reference, resolved through the host's
    /// [`HandlerFactory`] at dispatch time.
    TypeMethod {
        /// Name of the type to construct.
        type_name: String,
        /// Method to invoke on the constructed instance.
        method: String,
    },
}

impl Handler {
    /// Wraps a closure handler.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&[&str]) -> Value + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Builds a `Type.Method` reference handler.
    pub fn type_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::TypeMethod {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Parses a `"Type.Method"` reference string. Returns `None` when the
    /// string is not a two-part dotted reference.
    pub fn parse_ref(reference: &str) -> Option<Self> {
        let (type_name, method) = reference.split_once('.')?;
        if type_name.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self::type_method(type_name, method))
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Func(_) => f.write_str("Handler::Func"),
            Self::TypeMethod { type_name, method } => {
                write!(f, "Handler::TypeMethod({type_name}.{method})")
            }
        }
    }
}

/// Constructs handler types and invokes their methods on behalf of the
/// router. Supplied by the host's dependency-injection layer; the router
/// only requires that such resolution exists, not how it works.
pub trait HandlerFactory {
    /// Constructs `type_name` with no arguments and invokes `method` with
    /// the positional parameter values.
    ///
    /// # Errors
    ///
    /// Implementations must report a missing method as
    /// [`crate::RouterError::UndefinedMethod`]; the router propagates the
    /// error to the caller unchanged.
    fn dispatch(&self, type_name: &str, method: &str, args: &[&str]) -> Result<Value>;
}
