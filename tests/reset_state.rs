//! Journal-level verification of the initial-state reset sequence.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{Call, FakeContext};
use pretty_assertions::assert_eq;
use webgl_constants as gl;
use webgl_debug::{reset_to_initial_state, ApiVersion, CallError, GlValue, RenderingContext};

fn journal_names(journal: &Rc<RefCell<Vec<Call>>>) -> Vec<String> {
    journal.borrow().iter().map(|(name, _)| name.clone()).collect()
}

fn count_of(journal: &Rc<RefCell<Vec<Call>>>, name: &str) -> usize {
    journal.borrow().iter().filter(|(n, _)| n == name).count()
}

fn args_of(journal: &Rc<RefCell<Vec<Call>>>, name: &str) -> Vec<GlValue> {
    journal
        .borrow()
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, args)| args.clone())
        .unwrap_or_default()
}

fn scripted(api: ApiVersion, attribs: i32, texture_units: i32) -> FakeContext {
    let mut ctx = FakeContext::new(api);
    ctx.script_parameter(gl::MAX_VERTEX_ATTRIBS, attribs.into());
    ctx.script_parameter(gl::MAX_TEXTURE_IMAGE_UNITS, texture_units.into());
    ctx
}

#[test]
fn a_webgl1_pass_covers_attribs_units_and_fixed_function_state() {
    let mut ctx = scripted(ApiVersion::WebGl1, 2, 2);
    let journal = ctx.journal();

    reset_to_initial_state(&mut ctx).unwrap();

    let names = journal_names(&journal);
    assert_eq!(names.first().map(String::as_str), Some("getParameter"));
    assert_eq!(names.last().map(String::as_str), Some("clear"));

    // One pass per advertised attribute slot.
    assert_eq!(count_of(&journal, "disableVertexAttribArray"), 2);
    assert_eq!(count_of(&journal, "vertexAttrib1f"), 2);
    // Cube map and 2D per advertised texture unit.
    assert_eq!(count_of(&journal, "bindTexture"), 4);
    // Once per unit, once to land back on unit zero.
    assert_eq!(count_of(&journal, "activeTexture"), 3);

    for gl2_only in ["bindVertexArray", "vertexAttribDivisor", "bindSampler", "drawBuffers"] {
        assert!(!names.iter().any(|n| n == gl2_only), "{gl2_only} on a 1.0 pass");
    }
}

#[test]
fn a_webgl2_pass_adds_the_extra_targets() {
    let mut ctx = scripted(ApiVersion::WebGl2, 1, 1);
    let journal = ctx.journal();

    reset_to_initial_state(&mut ctx).unwrap();

    let names = journal_names(&journal);
    assert_eq!(names.first().map(String::as_str), Some("bindVertexArray"));
    assert_eq!(count_of(&journal, "vertexAttribDivisor"), 1);
    assert_eq!(count_of(&journal, "bindSampler"), 1);
    // 2D array and 3D targets join cube map and 2D.
    assert_eq!(count_of(&journal, "bindTexture"), 4);

    assert_eq!(
        args_of(&journal, "drawBuffers"),
        vec![GlValue::Array(vec![gl::BACK.into()])]
    );
    assert_eq!(args_of(&journal, "readBuffer"), vec![GlValue::from(gl::BACK)]);
    // The last unbind covers the uniform buffer target.
    let (last_name, last_args) = journal.borrow().last().cloned().unwrap();
    assert_eq!(last_name, "bindBuffer");
    assert_eq!(
        last_args,
        vec![GlValue::from(gl::UNIFORM_BUFFER), GlValue::Null]
    );
}

#[test]
fn scissor_and_viewport_track_the_drawing_buffer() {
    let mut ctx = scripted(ApiVersion::WebGl1, 0, 0);
    ctx.set_size(640, 480);
    let journal = ctx.journal();

    reset_to_initial_state(&mut ctx).unwrap();

    let expected: Vec<GlValue> = vec![0.into(), 0.into(), 640.into(), 480.into()];
    assert_eq!(args_of(&journal, "scissor"), expected);
    assert_eq!(args_of(&journal, "viewport"), expected);
}

#[test]
fn the_final_clear_hits_all_three_buffers() {
    let mut ctx = scripted(ApiVersion::WebGl1, 0, 0);
    let journal = ctx.journal();

    reset_to_initial_state(&mut ctx).unwrap();

    let mask = gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT;
    assert_eq!(args_of(&journal, "clear"), vec![GlValue::from(mask)]);
}

#[test]
fn operations_the_host_rejects_are_skipped() {
    let mut ctx = scripted(ApiVersion::WebGl2, 1, 1);
    ctx.reject_as_unknown("bindSampler");
    let journal = ctx.journal();

    reset_to_initial_state(&mut ctx).unwrap();

    // The rejected operation was attempted, and the pass kept going.
    assert_eq!(count_of(&journal, "bindSampler"), 1);
    assert_eq!(count_of(&journal, "clear"), 1);
}

#[test]
fn a_context_failure_aborts_the_pass() {
    let mut ctx = scripted(ApiVersion::WebGl1, 0, 0);
    ctx.fail_call("useProgram", "device removed");
    let journal = ctx.journal();

    let err = reset_to_initial_state(&mut ctx).unwrap_err();
    assert_eq!(
        err,
        CallError::Context {
            operation: "useProgram".to_owned(),
            message: "device removed".to_owned(),
        }
    );
    assert_eq!(count_of(&journal, "bindFramebuffer"), 0);
}

#[test]
fn pending_errors_are_drained_at_the_end() {
    let mut ctx = scripted(ApiVersion::WebGl1, 0, 0);
    ctx.push_error(gl::INVALID_OPERATION);
    ctx.push_error(gl::OUT_OF_MEMORY);

    reset_to_initial_state(&mut ctx).unwrap();

    assert_eq!(ctx.poll_error(), gl::NO_ERROR);
}
