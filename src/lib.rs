//! Debugging instrumentation for WebGL-style rendering contexts.
//!
//! Graphics APIs in this family fail silently: a bad call records an error
//! code that nobody sees unless the application polls for it, and a lost
//! device turns every subsequent call into a no-op. This crate makes both
//! failure modes visible and testable:
//!
//! - [`EnumRegistry`] / [`gl_enum_to_string`]: numeric constant to symbolic
//!   name translation, including values shared by several names
//! - [`format_call_arguments`]: renders an intercepted call's argument list
//!   with enum positions resolved through the registry
//! - [`DebugContext`]: wraps a [`RenderingContext`], polls the error query
//!   after every call and reports failures through a hook or the log
//! - [`CallTrace`]: bounded ring of intercepted calls, exportable as JSON
//! - [`LostContextCanvas`]: simulates context loss and restoration, with
//!   call-countdown triggers and timer-driven restore via a [`TaskScheduler`]
//! - [`reset_to_initial_state`]: drives a context back to its documented
//!   default state between test cases
//!
//! Constant and signature tables live in the `webgl-constants` crate; call
//! [`initialize`] for an [`ApiVersion`] before formatting anything.

mod context;
mod debug;
mod error;
mod format;
mod lost;
mod registry;
mod reset;
mod schedule;
mod trace;
mod value;

pub use context::RenderingContext;
pub use debug::{CallRecord, DebugContext, ErrorEvent};
pub use error::{CallError, DebugError, Result};
pub use format::{format_call_argument, format_call_arguments};
pub use lost::{LostContextCanvas, RenderSurface, SimulatedContext, SimulatorState};
pub use registry::{gl_enum_to_string, initialize, might_be_enum, EnumRegistry};
pub use reset::reset_to_initial_state;
pub use schedule::{ManualScheduler, TaskId, TaskScheduler};
pub use trace::CallTrace;
pub use value::{GlObject, GlValue, ObjectKind};

pub use webgl_constants as constants;
pub use webgl_constants::{ApiVersion, GlEnum};
