#![allow(dead_code)]

// Shared fakes for the integration tests. Kept in a submodule so Cargo does
// not compile it as a test target of its own.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use webgl_debug::{ApiVersion, CallError, GlEnum, GlValue, RenderSurface, RenderingContext};
use webgl_constants::NO_ERROR;

pub type Call = (String, Vec<GlValue>);

/// Scriptable in-memory context.
///
/// Every invocation is journalled with its arguments. Results, parameter
/// answers and error codes are scripted per operation name, so tests can
/// stage exact host behaviour without a real driver.
pub struct FakeContext {
    api: ApiVersion,
    journal: Rc<RefCell<Vec<Call>>>,
    pending_errors: VecDeque<GlEnum>,
    errors_by_call: HashMap<String, Vec<GlEnum>>,
    results: HashMap<String, GlValue>,
    parameters: HashMap<GlEnum, GlValue>,
    unknown_ops: HashSet<String>,
    failures: HashMap<String, String>,
    size: (u32, u32),
}

impl FakeContext {
    pub fn new(api: ApiVersion) -> Self {
        Self {
            api,
            journal: Rc::new(RefCell::new(Vec::new())),
            pending_errors: VecDeque::new(),
            errors_by_call: HashMap::new(),
            results: HashMap::new(),
            parameters: HashMap::new(),
            unknown_ops: HashSet::new(),
            failures: HashMap::new(),
            size: (300, 150),
        }
    }

    /// Shared handle to the call journal, usable after the context has been
    /// moved into a wrapper.
    pub fn journal(&self) -> Rc<RefCell<Vec<Call>>> {
        Rc::clone(&self.journal)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Scripts the return value for an operation.
    pub fn script_result(&mut self, name: &str, value: GlValue) {
        self.results.insert(name.to_owned(), value);
    }

    /// Scripts the answer `getParameter` gives for `pname`.
    pub fn script_parameter(&mut self, pname: GlEnum, value: GlValue) {
        self.parameters.insert(pname, value);
    }

    /// Queues an error code as already pending on the context.
    pub fn push_error(&mut self, code: GlEnum) {
        self.pending_errors.push_back(code);
    }

    /// Makes every invocation of `name` record `code` as a pending error.
    pub fn error_on(&mut self, name: &str, code: GlEnum) {
        self.errors_by_call
            .entry(name.to_owned())
            .or_default()
            .push(code);
    }

    /// Makes `name` fail with `CallError::UnknownOperation`.
    pub fn reject_as_unknown(&mut self, name: &str) {
        self.unknown_ops.insert(name.to_owned());
    }

    /// Makes `name` fail abruptly with `CallError::Context`.
    pub fn fail_call(&mut self, name: &str, message: &str) {
        self.failures.insert(name.to_owned(), message.to_owned());
    }
}

impl RenderingContext for FakeContext {
    fn api(&self) -> ApiVersion {
        self.api
    }

    fn invoke(&mut self, name: &str, args: &[GlValue]) -> Result<GlValue, CallError> {
        self.journal
            .borrow_mut()
            .push((name.to_owned(), args.to_vec()));

        if self.unknown_ops.contains(name) {
            return Err(CallError::UnknownOperation(name.to_owned()));
        }
        if let Some(message) = self.failures.get(name) {
            return Err(CallError::Context {
                operation: name.to_owned(),
                message: message.clone(),
            });
        }
        if let Some(codes) = self.errors_by_call.get(name) {
            self.pending_errors.extend(codes.iter().copied());
        }

        if name == "getParameter" {
            let answer = args
                .first()
                .and_then(GlValue::as_gl_enum)
                .and_then(|pname| self.parameters.get(&pname))
                .cloned();
            return Ok(answer.unwrap_or(GlValue::Null));
        }

        Ok(self.results.get(name).cloned().unwrap_or(GlValue::Null))
    }

    fn poll_error(&mut self) -> GlEnum {
        self.pending_errors.pop_front().unwrap_or(NO_ERROR)
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.size
    }
}

/// Surface owning one pre-scripted [`FakeContext`].
pub struct FakeSurface {
    context: Option<FakeContext>,
}

impl FakeSurface {
    pub fn new(context: FakeContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// A surface that cannot provide any context.
    pub fn empty() -> Self {
        Self { context: None }
    }
}

impl RenderSurface for FakeSurface {
    type Context = FakeContext;

    fn create_context(&mut self, api: ApiVersion) -> Option<FakeContext> {
        match self.context.take() {
            Some(ctx) if ctx.api() == api => Some(ctx),
            Some(ctx) => {
                self.context = Some(ctx);
                None
            }
            None => None,
        }
    }
}
