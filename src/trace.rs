//! Bounded recorder for intercepted calls.
//!
//! A [`CallTrace`] keeps the most recent calls seen by a
//! [`DebugContext`](crate::DebugContext) so a capture can be inspected or
//! exported after the fact. Recording is opt-in per trace and the ring
//! evicts the oldest record once full, so leaving a trace attached to a
//! long-lived context is safe.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::debug::CallRecord;

#[derive(Debug)]
pub struct CallTrace {
    enabled: bool,
    max_calls: usize,
    calls: VecDeque<CallRecord>,
}

impl Default for CallTrace {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl CallTrace {
    pub fn new(max_calls: usize) -> Self {
        Self {
            enabled: true,
            max_calls: max_calls.max(1),
            calls: VecDeque::new(),
        }
    }

    /// Builds a call hook that appends every intercepted call to `trace`.
    ///
    /// The returned closure is meant for
    /// [`DebugContext::on_call`](crate::DebugContext::on_call); the trace
    /// stays shared, so the caller keeps its own handle for draining.
    pub fn hook(trace: &Rc<RefCell<CallTrace>>) -> impl FnMut(&CallRecord) + 'static {
        let trace = Rc::clone(trace);
        move |record| trace.borrow_mut().record(record.clone())
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn record(&mut self, record: CallRecord) {
        if !self.enabled {
            return;
        }

        if self.calls.len() == self.max_calls {
            self.calls.pop_front();
        }
        self.calls.push_back(record);
    }

    pub fn drain(&mut self, max: usize) -> Vec<CallRecord> {
        let mut out = Vec::new();
        let max = max.min(self.calls.len());
        for _ in 0..max {
            if let Some(record) = self.calls.pop_front() {
                out.push(record);
            }
        }
        out
    }

    pub fn export_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::GlValue;

    fn call(name: &str) -> CallRecord {
        CallRecord {
            function_name: name.to_string(),
            args: Vec::new(),
        }
    }

    #[test]
    fn ring_evicts_the_oldest_call() {
        let mut trace = CallTrace::new(2);
        trace.record(call("enable"));
        trace.record(call("clear"));
        trace.record(call("flush"));

        let names: Vec<String> = trace
            .drain(10)
            .into_iter()
            .map(|record| record.function_name)
            .collect();
        assert_eq!(names, vec!["clear".to_string(), "flush".to_string()]);
    }

    #[test]
    fn disabled_trace_records_nothing() {
        let mut trace = CallTrace::new(8);
        trace.disable();
        trace.record(call("enable"));

        assert!(trace.is_empty());

        trace.enable();
        trace.record(call("enable"));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn drain_is_bounded_and_in_order() {
        let mut trace = CallTrace::new(8);
        trace.record(call("first"));
        trace.record(call("second"));
        trace.record(call("third"));

        let drained = trace.drain(2);
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].function_name, "first");
        assert_eq!(drained[1].function_name, "second");
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn export_is_valid_json() {
        let mut trace = CallTrace::new(8);
        trace.record(CallRecord {
            function_name: "clearColor".to_string(),
            args: vec![
                GlValue::from(0.0f32),
                GlValue::from(0.0f32),
                GlValue::from(0.0f32),
                GlValue::from(1.0f32),
            ],
        });

        let bytes = trace.export_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed[0]["function_name"], "clearColor");
        assert_eq!(parsed[0]["args"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn hook_feeds_a_shared_trace() {
        let trace = Rc::new(RefCell::new(CallTrace::new(8)));
        let mut hook = CallTrace::hook(&trace);

        hook(&call("finish"));

        assert_eq!(trace.borrow().len(), 1);
    }
}
