//! One-shot task scheduling for deferred context restoration.
//!
//! The simulator arms a restore timer when a context is lost. Hosts with a
//! real event loop implement [`TaskScheduler`] on top of it; tests and
//! headless hosts use [`ManualScheduler`], which only moves when
//! [`ManualScheduler::advance`] is called, so timer-driven behaviour can be
//! exercised deterministically.

use std::cell::RefCell;
use std::fmt;

/// Handle for a scheduled task, used to cancel it before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

pub trait TaskScheduler {
    /// Schedules `task` to run once, `delay_ms` milliseconds from now.
    fn schedule_once(&self, delay_ms: u64, task: Box<dyn FnOnce()>) -> TaskId;

    /// Cancels a scheduled task. Cancelling a task that already fired (or
    /// was never scheduled here) is a no-op.
    fn cancel(&self, id: TaskId);
}

struct PendingTask {
    id: TaskId,
    deadline_ms: u64,
    task: Box<dyn FnOnce()>,
}

struct Inner {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Virtual-time scheduler driven explicitly by the caller.
pub struct ManualScheduler {
    inner: RefCell<Inner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                now_ms: 0,
                next_id: 1,
                pending: Vec::new(),
            }),
        }
    }

    /// Returns the current virtual time, in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Advances virtual time by `ms`, running every task whose deadline is
    /// reached, in deadline order (submission order on ties).
    ///
    /// Tasks run without the queue borrowed, so a task may schedule or
    /// cancel further tasks; a task scheduled inside `advance` still fires
    /// in the same call if its deadline falls within the window.
    pub fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now_ms.saturating_add(ms);

        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let next = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.deadline_ms <= target)
                    .min_by_key(|(_, entry)| (entry.deadline_ms, entry.id.0))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let entry = inner.pending.remove(index);
                        inner.now_ms = inner.now_ms.max(entry.deadline_ms);
                        Some(entry.task)
                    }
                    None => None,
                }
            };

            match due {
                Some(task) => task(),
                None => break,
            }
        }

        self.inner.borrow_mut().now_ms = target;
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler for ManualScheduler {
    fn schedule_once(&self, delay_ms: u64, task: Box<dyn FnOnce()>) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = TaskId(inner.next_id);
        inner.next_id += 1;

        let deadline_ms = inner.now_ms.saturating_add(delay_ms);
        inner.pending.push(PendingTask {
            id,
            deadline_ms,
            task,
        });
        id
    }

    fn cancel(&self, id: TaskId) {
        self.inner
            .borrow_mut()
            .pending
            .retain(|entry| entry.id != id);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualScheduler")
            .field("now_ms", &inner.now_ms)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn mark(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> Box<dyn FnOnce()> {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(label))
    }

    #[test]
    fn advance_runs_only_due_tasks() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        sched.schedule_once(5, mark(&log, "early"));
        sched.schedule_once(20, mark(&log, "late"));

        sched.advance(10);
        assert_eq!(*log.borrow(), vec!["early"]);
        assert_eq!(sched.now_ms(), 10);
        assert_eq!(sched.pending(), 1);

        sched.advance(10);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn ties_fire_in_submission_order() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        sched.schedule_once(10, mark(&log, "first"));
        sched.schedule_once(5, mark(&log, "soonest"));
        sched.schedule_once(10, mark(&log, "second"));

        sched.advance(10);
        assert_eq!(*log.borrow(), vec!["soonest", "first", "second"]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let id = sched.schedule_once(5, mark(&log, "cancelled"));
        sched.schedule_once(5, mark(&log, "kept"));
        sched.cancel(id);

        sched.advance(10);
        assert_eq!(*log.borrow(), vec!["kept"]);

        // Stale handles are ignored.
        sched.cancel(id);
    }

    #[test]
    fn tasks_scheduled_while_advancing_can_fire_in_the_same_window() {
        let sched = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let chained = {
            let sched = Rc::clone(&sched);
            let log = Rc::clone(&log);
            Box::new(move || {
                log.borrow_mut().push("outer");
                sched.schedule_once(2, {
                    let log = Rc::clone(&log);
                    Box::new(move || log.borrow_mut().push("inner"))
                });
            })
        };
        sched.schedule_once(5, chained);

        sched.advance(10);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
        assert_eq!(sched.now_ms(), 10);
    }
}
