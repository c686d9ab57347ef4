//! Host-side simulation of lost and restored contexts.
//!
//! [`LostContextCanvas`] wraps a [`RenderSurface`] and hands out
//! [`SimulatedContext`] handles whose calls are counted and can be cut off,
//! either immediately through [`LostContextCanvas::lose_context`] or after a
//! countdown armed with [`LostContextCanvas::lose_context_in_calls`]. While
//! the context is lost, calls return null results without reaching the host,
//! the error query reports `CONTEXT_LOST_WEBGL` once, and further
//! `get_context` requests return `None`. Restoration resets the underlying
//! context state and can be driven automatically by a [`TaskScheduler`]
//! timer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};
use webgl_constants::{ApiVersion, GlEnum, CONTEXT_LOST_WEBGL, NO_ERROR};

use crate::context::RenderingContext;
use crate::error::{CallError, DebugError};
use crate::reset::reset_to_initial_state;
use crate::schedule::{TaskId, TaskScheduler};
use crate::value::GlValue;

/// Source of real contexts for a [`LostContextCanvas`].
///
/// A surface creates at most one context per canvas; the canvas keeps it for
/// the whole simulation so restores reuse the original context instead of
/// asking for a new one.
pub trait RenderSurface {
    type Context: RenderingContext;

    /// Creates a context for `api`, or `None` if the surface cannot provide
    /// one (unsupported version, host failure).
    fn create_context(&mut self, api: ApiVersion) -> Option<Self::Context>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Live,
    /// Context is lost and will stay lost until an explicit restore.
    Lost,
    /// Context is lost with a restore timer pending.
    Restoring,
}

type Observer = Box<dyn FnMut()>;

struct Shared<C> {
    scheduler: Rc<dyn TaskScheduler>,
    ctx: Option<C>,
    api: Option<ApiVersion>,
    state: SimulatorState,
    generation: u64,
    num_calls: u64,
    lose_at: Option<u64>,
    restore_timeout_ms: i64,
    pending_restore: Option<TaskId>,
    error_shadow: VecDeque<GlEnum>,
    on_lost: Vec<Observer>,
    on_restored: Vec<Observer>,
}

/// Canvas wrapper that simulates context loss for the contexts it hands out.
pub struct LostContextCanvas<S: RenderSurface> {
    surface: S,
    shared: Rc<RefCell<Shared<S::Context>>>,
}

impl<S: RenderSurface> LostContextCanvas<S>
where
    S::Context: 'static,
{
    pub fn new(surface: S, scheduler: Rc<dyn TaskScheduler>) -> Self {
        Self {
            surface,
            shared: Rc::new(RefCell::new(Shared {
                scheduler,
                ctx: None,
                api: None,
                state: SimulatorState::Live,
                generation: 1,
                num_calls: 0,
                lose_at: None,
                restore_timeout_ms: 0,
                pending_restore: None,
                error_shadow: VecDeque::new(),
                on_lost: Vec::new(),
                on_restored: Vec::new(),
            })),
        }
    }

    /// Returns a context handle for `api`, creating the real context on the
    /// first request. Returns `None` while the context is lost, when the
    /// surface cannot provide a context, or when `api` differs from the
    /// version the canvas already created.
    pub fn get_context(&mut self, api: ApiVersion) -> Option<SimulatedContext<S::Context>> {
        {
            let inner = self.shared.borrow();
            if inner.state != SimulatorState::Live {
                return None;
            }
            if let Some(existing) = inner.api {
                if existing != api {
                    return None;
                }
                if inner.ctx.is_some() {
                    return Some(SimulatedContext {
                        shared: Rc::clone(&self.shared),
                        api,
                    });
                }
            }
        }

        let ctx = self.surface.create_context(api)?;
        let mut inner = self.shared.borrow_mut();
        inner.api = Some(api);
        inner.ctx = Some(ctx);
        drop(inner);
        Some(SimulatedContext {
            shared: Rc::clone(&self.shared),
            api,
        })
    }

    /// Loses the context immediately. No-op if it is already lost.
    pub fn lose_context(&mut self) {
        lose_now(&self.shared);
    }

    /// Arms a countdown: after another `calls` intercepted calls the context
    /// is lost, with the triggering call itself swallowed.
    pub fn lose_context_in_calls(&mut self, calls: u64) -> Result<(), DebugError> {
        let mut inner = self.shared.borrow_mut();
        if inner.state != SimulatorState::Live {
            return Err(DebugError::AlreadyLost);
        }
        inner.lose_at = Some(inner.num_calls + calls);
        Ok(())
    }

    /// Restores a lost context: cancels any pending restore timer, resets the
    /// underlying context state and notifies restore observers. Idempotent
    /// while live.
    pub fn restore_context(&mut self) {
        restore_now(&self.shared);
    }

    /// Sets the restore delay, in milliseconds, used by future loss events.
    /// Negative values disable automatic restoring; an already-armed timer is
    /// unaffected.
    pub fn set_restore_timeout(&mut self, ms: i64) {
        self.shared.borrow_mut().restore_timeout_ms = ms;
    }

    /// Cumulative count of intercepted calls since the canvas was created.
    pub fn num_calls(&self) -> u64 {
        self.shared.borrow().num_calls
    }

    /// Generation counter for the canvas's context, bumped on every loss.
    pub fn context_generation(&self) -> u64 {
        self.shared.borrow().generation
    }

    pub fn state(&self) -> SimulatorState {
        self.shared.borrow().state
    }

    pub fn on_context_lost(&mut self, observer: impl FnMut() + 'static) {
        self.shared.borrow_mut().on_lost.push(Box::new(observer));
    }

    pub fn on_context_restored(&mut self, observer: impl FnMut() + 'static) {
        self.shared
            .borrow_mut()
            .on_restored
            .push(Box::new(observer));
    }
}

impl<S: RenderSurface> fmt::Debug for LostContextCanvas<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.borrow();
        f.debug_struct("LostContextCanvas")
            .field("state", &inner.state)
            .field("generation", &inner.generation)
            .field("num_calls", &inner.num_calls)
            .finish_non_exhaustive()
    }
}

/// Cloneable context handle handed out by [`LostContextCanvas::get_context`].
pub struct SimulatedContext<C> {
    shared: Rc<RefCell<Shared<C>>>,
    api: ApiVersion,
}

impl<C> Clone for SimulatedContext<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            api: self.api,
        }
    }
}

impl<C> fmt::Debug for SimulatedContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.borrow();
        f.debug_struct("SimulatedContext")
            .field("api", &self.api)
            .field("state", &inner.state)
            .finish_non_exhaustive()
    }
}

impl<C> RenderingContext for SimulatedContext<C>
where
    C: RenderingContext + 'static,
{
    fn api(&self) -> ApiVersion {
        self.api
    }

    fn invoke(&mut self, name: &str, args: &[GlValue]) -> Result<GlValue, CallError> {
        // The lost-state query stays answerable (and uncounted) at all times.
        if name == "isContextLost" {
            let lost = self.shared.borrow().state != SimulatorState::Live;
            return Ok(lost.into());
        }

        {
            let mut inner = self.shared.borrow_mut();
            inner.num_calls += 1;
            let due = inner.state == SimulatorState::Live
                && matches!(inner.lose_at, Some(at) if inner.num_calls >= at);
            if !due {
                if inner.state != SimulatorState::Live {
                    return Ok(GlValue::Null);
                }
                inner.error_shadow.clear();
                let Some(ctx) = inner.ctx.as_mut() else {
                    return Ok(GlValue::Null);
                };
                return ctx.invoke(name, args);
            }
        }

        // The countdown expired on this call: lose the context and swallow
        // the call without forwarding it.
        lose_now(&self.shared);
        Ok(GlValue::Null)
    }

    fn poll_error(&mut self) -> GlEnum {
        let due = {
            let mut inner = self.shared.borrow_mut();
            inner.num_calls += 1;
            inner.state == SimulatorState::Live
                && matches!(inner.lose_at, Some(at) if inner.num_calls >= at)
        };
        if due {
            lose_now(&self.shared);
        }

        let mut guard = self.shared.borrow_mut();
        let Shared {
            ctx,
            error_shadow,
            state,
            ..
        } = &mut *guard;
        if *state == SimulatorState::Live {
            if let Some(ctx) = ctx.as_mut() {
                loop {
                    let code = ctx.poll_error();
                    if code == NO_ERROR {
                        break;
                    }
                    if !error_shadow.contains(&code) {
                        error_shadow.push_back(code);
                    }
                }
            }
        }
        error_shadow.pop_front().unwrap_or(NO_ERROR)
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.shared
            .borrow()
            .ctx
            .as_ref()
            .map(|ctx| ctx.drawing_buffer_size())
            .unwrap_or((0, 0))
    }
}

fn lose_now<C: RenderingContext + 'static>(shared: &Rc<RefCell<Shared<C>>>) {
    {
        let mut inner = shared.borrow_mut();
        if inner.state != SimulatorState::Live {
            return;
        }
        inner.state = SimulatorState::Lost;
        inner.lose_at = None;
        inner.generation += 1;
        if let Some(ctx) = inner.ctx.as_mut() {
            while ctx.poll_error() != NO_ERROR {}
        }
        inner.error_shadow.clear();
        inner.error_shadow.push_back(CONTEXT_LOST_WEBGL);
        debug!(generation = inner.generation, "context lost");
    }

    dispatch(shared, |inner| &mut inner.on_lost);
    arm_restore(shared);
}

fn restore_now<C: RenderingContext + 'static>(shared: &Rc<RefCell<Shared<C>>>) {
    {
        let mut inner = shared.borrow_mut();
        if inner.state == SimulatorState::Live {
            return;
        }
        if let Some(id) = inner.pending_restore.take() {
            inner.scheduler.cancel(id);
        }
        if let Some(ctx) = inner.ctx.as_mut() {
            if let Err(err) = reset_to_initial_state(ctx) {
                warn!("state reset during restore failed: {err}");
            }
        }
        inner.state = SimulatorState::Live;
        debug!(generation = inner.generation, "context restored");
    }

    dispatch(shared, |inner| &mut inner.on_restored);
}

fn arm_restore<C: RenderingContext + 'static>(shared: &Rc<RefCell<Shared<C>>>) {
    let (delay_ms, scheduler) = {
        let inner = shared.borrow();
        // A lost observer may have restored the context or disabled the
        // timer; arm only if the context is still waiting.
        if inner.state != SimulatorState::Lost || inner.restore_timeout_ms < 0 {
            return;
        }
        (inner.restore_timeout_ms as u64, Rc::clone(&inner.scheduler))
    };

    let weak = Rc::downgrade(shared);
    let id = scheduler.schedule_once(
        delay_ms,
        Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                restore_now(&shared);
            }
        }),
    );

    let mut inner = shared.borrow_mut();
    inner.pending_restore = Some(id);
    inner.state = SimulatorState::Restoring;
}

/// Runs the selected observer list against a pre-dispatch snapshot, so
/// observers registered during dispatch only see later events.
fn dispatch<C>(shared: &Rc<RefCell<Shared<C>>>, select: fn(&mut Shared<C>) -> &mut Vec<Observer>) {
    let mut callbacks = std::mem::take(select(&mut *shared.borrow_mut()));
    for callback in callbacks.iter_mut() {
        callback();
    }

    let mut inner = shared.borrow_mut();
    let added = std::mem::take(select(&mut *inner));
    let list = select(&mut *inner);
    *list = callbacks;
    list.extend(added);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    struct StubContext {
        api: ApiVersion,
        journal: Rc<RefCell<Vec<String>>>,
        errors: VecDeque<GlEnum>,
    }

    impl RenderingContext for StubContext {
        fn api(&self) -> ApiVersion {
            self.api
        }

        fn invoke(&mut self, name: &str, _args: &[GlValue]) -> Result<GlValue, CallError> {
            self.journal.borrow_mut().push(name.to_owned());
            Ok(GlValue::Null)
        }

        fn poll_error(&mut self) -> GlEnum {
            self.errors.pop_front().unwrap_or(NO_ERROR)
        }

        fn drawing_buffer_size(&self) -> (u32, u32) {
            (300, 150)
        }
    }

    struct StubSurface {
        journal: Rc<RefCell<Vec<String>>>,
        seeded_errors: VecDeque<GlEnum>,
    }

    impl RenderSurface for StubSurface {
        type Context = StubContext;

        fn create_context(&mut self, api: ApiVersion) -> Option<StubContext> {
            Some(StubContext {
                api,
                journal: Rc::clone(&self.journal),
                errors: std::mem::take(&mut self.seeded_errors),
            })
        }
    }

    fn stub_canvas(
        seeded_errors: &[GlEnum],
    ) -> (LostContextCanvas<StubSurface>, Rc<RefCell<Vec<String>>>) {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let surface = StubSurface {
            journal: Rc::clone(&journal),
            seeded_errors: seeded_errors.iter().copied().collect(),
        };
        let canvas = LostContextCanvas::new(surface, Rc::new(ManualScheduler::new()));
        (canvas, journal)
    }

    #[test]
    fn call_counter_skips_the_lost_state_query() {
        let (mut canvas, journal) = stub_canvas(&[]);
        let mut ctx = canvas.get_context(ApiVersion::WebGl1).unwrap();

        ctx.invoke("finish", &[]).unwrap();
        assert_eq!(ctx.invoke("isContextLost", &[]).unwrap(), false.into());

        assert_eq!(canvas.num_calls(), 1);
        assert_eq!(*journal.borrow(), vec!["finish".to_owned()]);
    }

    #[test]
    fn countdown_swallows_the_triggering_call() {
        let (mut canvas, journal) = stub_canvas(&[]);
        canvas.set_restore_timeout(-1);
        let mut ctx = canvas.get_context(ApiVersion::WebGl1).unwrap();

        canvas.lose_context_in_calls(3).unwrap();
        ctx.invoke("flush", &[]).unwrap();
        ctx.invoke("flush", &[]).unwrap();
        assert_eq!(canvas.state(), SimulatorState::Live);

        assert_eq!(ctx.invoke("flush", &[]).unwrap(), GlValue::Null);
        assert_eq!(canvas.state(), SimulatorState::Lost);
        assert_eq!(canvas.num_calls(), 3);
        assert_eq!(journal.borrow().len(), 2);

        assert_eq!(
            canvas.lose_context_in_calls(1),
            Err(DebugError::AlreadyLost)
        );
    }

    #[test]
    fn observers_added_during_dispatch_wait_for_the_next_event() {
        let (mut canvas, _journal) = stub_canvas(&[]);
        canvas.set_restore_timeout(-1);
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&order);
        let shared = Rc::clone(&canvas.shared);
        canvas.on_context_lost(move || {
            log.borrow_mut().push("early");
            let late = Rc::clone(&log);
            shared
                .borrow_mut()
                .on_lost
                .push(Box::new(move || late.borrow_mut().push("late")));
        });

        canvas.lose_context();
        assert_eq!(*order.borrow(), vec!["early"]);

        // The observer registered mid-dispatch joins from the next loss on.
        canvas.restore_context();
        canvas.lose_context();
        assert_eq!(*order.borrow(), vec!["early", "early", "late"]);
    }

    #[test]
    fn loss_discards_real_errors_and_shadows_the_lost_code() {
        let (mut canvas, journal) = stub_canvas(&[0x0502, 0x0505]);
        canvas.set_restore_timeout(-1);
        let mut ctx = canvas.get_context(ApiVersion::WebGl1).unwrap();

        canvas.lose_context();
        assert_eq!(ctx.invoke("isContextLost", &[]).unwrap(), true.into());
        assert_eq!(ctx.poll_error(), CONTEXT_LOST_WEBGL);
        assert_eq!(ctx.poll_error(), NO_ERROR);

        // Nothing was forwarded while lost.
        assert_eq!(ctx.invoke("flush", &[]).unwrap(), GlValue::Null);
        assert!(journal.borrow().is_empty());
    }
}
