//! The uniform call surface both wrappers implement and consume.

use webgl_constants::{ApiVersion, GlEnum};

use crate::error::CallError;
use crate::value::GlValue;

/// A WebGL-style rendering context with a name-driven operation surface.
///
/// The wrappers in this crate ([`DebugContext`](crate::DebugContext),
/// [`SimulatedContext`](crate::SimulatedContext)) implement this trait themselves, so code
/// written against it behaves identically whether it holds a raw or a wrapped context.
///
/// `invoke` covers every operation the context's API revision declares (see
/// [`webgl_constants::signatures`]). Error polling is a separate method rather than an
/// `invoke` name: the debug wrapper owns that channel so it can replay codes it has already
/// consumed.
pub trait RenderingContext {
    /// API revision this context was created against.
    fn api(&self) -> ApiVersion;

    /// Invokes the operation `name` with `args`.
    ///
    /// Failures of the underlying implementation surface as [`CallError`]; wrappers propagate
    /// them unchanged.
    fn invoke(&mut self, name: &str, args: &[GlValue]) -> Result<GlValue, CallError>;

    /// Pops the oldest pending error flag, `NO_ERROR` (0) when none is set.
    fn poll_error(&mut self) -> GlEnum;

    /// Current drawing buffer size in device pixels, `(width, height)`.
    fn drawing_buffer_size(&self) -> (u32, u32);
}
