use thiserror::Error;

use webgl_constants::ApiVersion;

pub type Result<T> = std::result::Result<T, DebugError>;

/// Misuse of the debug layer itself.
///
/// These are caller mistakes and are reported eagerly, before any work touches the wrapped
/// context. Failures raised by the context while servicing a call travel as [`CallError`]
/// instead and pass through the wrappers untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebugError {
    /// A name or formatting lookup ran before [`initialize`](crate::initialize) built the
    /// enum tables for that API revision.
    #[error("enum registry for {0} has not been initialized")]
    RegistryUninitialized(ApiVersion),

    /// A loss countdown was armed on a canvas whose context is already lost.
    #[error("context is already lost")]
    AlreadyLost,
}

/// Failure produced by the wrapped context while servicing a call.
///
/// The debug wrapper and the lost-context simulator both propagate these unchanged; an
/// application sees exactly the failure it would have seen talking to the context directly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError {
    /// The context does not implement the named operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The underlying implementation failed outright (driver loss, surface teardown, ...).
    #[error("context failure in {operation}: {message}")]
    Context { operation: String, message: String },
}
