//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// Malformed route template, reported at registration time.
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),

    /// A caller-supplied condition produced an uncompilable expression.
    #[error("failed to compile route pattern `{pattern}`")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Route name not found during reverse resolution.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A route must support at least one HTTP method.
    #[error("route has an empty method set")]
    EmptyMethods,

    /// A `Type.Method` handler reference names a method that does not exist
    /// on the constructed instance.
    #[error("undefined handler method: {type_name}.{method}")]
    UndefinedMethod { type_name: String, method: String },
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
