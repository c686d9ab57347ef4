//! Call interception around a live context.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use tracing::error;
use webgl_constants::{ApiVersion, GlEnum, NO_ERROR};

use crate::context::RenderingContext;
use crate::error::CallError;
use crate::format;
use crate::registry::{initialize, EnumRegistry};
use crate::value::GlValue;

/// One intercepted call, handed to the call hook before delegation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    pub function_name: String,
    pub args: Vec<GlValue>,
}

/// A protocol error observed by the post-call poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    pub code: GlEnum,
    pub function_name: String,
    pub args: Vec<GlValue>,
}

type CallHook = Box<dyn FnMut(&CallRecord)>;
type ErrorHook = Box<dyn FnMut(&ErrorEvent)>;

/// Interception wrapper around a live context.
///
/// Every `invoke` runs the call hook, delegates, polls the inner context's error state once,
/// and reports a non-zero code through the error hook (or the diagnostic sink when no hook is
/// installed). Codes the poll consumes are replayed by [`RenderingContext::poll_error`] on
/// the wrapper itself, so an application that polls for its own error handling still sees
/// them. Failures raised by the inner context pass through unchanged.
///
/// Construction initializes the enum registry for the context's API revision, so name
/// lookups against that revision never fail afterwards.
pub struct DebugContext<C> {
    inner: C,
    registry: &'static EnumRegistry,
    on_call: Option<CallHook>,
    on_error: Option<ErrorHook>,
    // One slot per code, like the real error flags; replayed oldest first.
    error_shadow: VecDeque<GlEnum>,
}

impl<C: RenderingContext> DebugContext<C> {
    pub fn new(ctx: C) -> Self {
        let registry = initialize(ctx.api());
        Self {
            inner: ctx,
            registry,
            on_call: None,
            on_error: None,
            error_shadow: VecDeque::new(),
        }
    }

    /// Installs a hook observing every call before it is delegated.
    pub fn on_call(mut self, hook: impl FnMut(&CallRecord) + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    /// Installs a hook observing every polled error code.
    ///
    /// Without one, errors are formatted and emitted through [`tracing::error!`]. The hook
    /// replaces that default entirely.
    pub fn on_error(mut self, hook: impl FnMut(&ErrorEvent) + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn report_error(&mut self, code: GlEnum, name: &str, args: &[GlValue]) {
        if !self.error_shadow.contains(&code) {
            self.error_shadow.push_back(code);
        }
        if let Some(hook) = &mut self.on_error {
            let event = ErrorEvent {
                code,
                function_name: name.to_owned(),
                args: args.to_vec(),
            };
            hook(&event);
        } else {
            error!(
                "WebGL error {} in {}{}",
                self.registry.name_of(code),
                name,
                format::arguments_with(self.registry, name, args)
            );
        }
    }
}

impl<C: RenderingContext> RenderingContext for DebugContext<C> {
    fn api(&self) -> ApiVersion {
        self.inner.api()
    }

    fn invoke(&mut self, name: &str, args: &[GlValue]) -> Result<GlValue, CallError> {
        if let Some(hook) = &mut self.on_call {
            let record = CallRecord {
                function_name: name.to_owned(),
                args: args.to_vec(),
            };
            hook(&record);
        }
        let result = self.inner.invoke(name, args)?;
        let code = self.inner.poll_error();
        if code != NO_ERROR {
            self.report_error(code, name, args);
        }
        Ok(result)
    }

    fn poll_error(&mut self) -> GlEnum {
        if let Some(code) = self.error_shadow.pop_front() {
            return code;
        }
        self.inner.poll_error()
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.inner.drawing_buffer_size()
    }
}

impl<C: fmt::Debug> fmt::Debug for DebugContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugContext")
            .field("inner", &self.inner)
            .field("error_shadow", &self.error_shadow)
            .finish_non_exhaustive()
    }
}
