//! Best-effort reset of a context to its documented initial state.
//!
//! Everything goes through the public operation surface, so any
//! [`RenderingContext`] host can be reset without exposing internals. The
//! sequence walks bindings, vertex attributes, texture units, fixed-function
//! state and pixel store settings, then clears all three buffers and drains
//! pending errors. Operations the context's version does not declare are
//! skipped, as are operations the host does not recognize; only a genuine
//! context failure aborts the pass.

use webgl_constants::signatures;
use webgl_constants::{
    ApiVersion, ALWAYS, ARRAY_BUFFER, BACK, BLEND, BROWSER_DEFAULT_WEBGL, CCW, COLOR_BUFFER_BIT,
    COPY_READ_BUFFER, COPY_WRITE_BUFFER, CULL_FACE, DEPTH_BUFFER_BIT, DEPTH_TEST, DITHER,
    DONT_CARE, ELEMENT_ARRAY_BUFFER, FLOAT, FRAMEBUFFER, FUNC_ADD, GENERATE_MIPMAP_HINT, KEEP,
    LESS, MAX_TEXTURE_IMAGE_UNITS, MAX_VERTEX_ATTRIBS, NO_ERROR, ONE, PACK_ALIGNMENT,
    PIXEL_PACK_BUFFER, PIXEL_UNPACK_BUFFER, RENDERBUFFER, SCISSOR_TEST, STENCIL_BUFFER_BIT,
    TEXTURE0, TEXTURE_2D, TEXTURE_2D_ARRAY, TEXTURE_3D, TEXTURE_CUBE_MAP,
    TRANSFORM_FEEDBACK_BUFFER, UNIFORM_BUFFER, UNPACK_ALIGNMENT,
    UNPACK_COLORSPACE_CONVERSION_WEBGL, UNPACK_FLIP_Y_WEBGL, UNPACK_PREMULTIPLY_ALPHA_WEBGL, ZERO,
};

use crate::context::RenderingContext;
use crate::error::CallError;
use crate::value::GlValue;

/// Restores every resettable piece of context state to its default value.
pub fn reset_to_initial_state<C: RenderingContext>(ctx: &mut C) -> Result<(), CallError> {
    let webgl2 = ctx.api() == ApiVersion::WebGl2;

    if webgl2 {
        call(ctx, "bindVertexArray", &[GlValue::Null])?;
    }

    let num_attribs = query(ctx, "getParameter", &[MAX_VERTEX_ATTRIBS.into()])?
        .as_i64()
        .unwrap_or(0);
    let scratch = query(ctx, "createBuffer", &[])?;
    call(ctx, "bindBuffer", &[ARRAY_BUFFER.into(), scratch.clone()])?;
    for index in 0..num_attribs {
        call(ctx, "disableVertexAttribArray", &[index.into()])?;
        call(
            ctx,
            "vertexAttribPointer",
            &[
                index.into(),
                4.into(),
                FLOAT.into(),
                false.into(),
                0.into(),
                0.into(),
            ],
        )?;
        call(ctx, "vertexAttrib1f", &[index.into(), 0.0.into()])?;
        if webgl2 {
            call(ctx, "vertexAttribDivisor", &[index.into(), 0.into()])?;
        }
    }
    call(ctx, "deleteBuffer", &[scratch])?;

    let num_texture_units = query(ctx, "getParameter", &[MAX_TEXTURE_IMAGE_UNITS.into()])?
        .as_i64()
        .unwrap_or(0);
    for unit in 0..num_texture_units {
        call(ctx, "activeTexture", &[(TEXTURE0 + unit as u32).into()])?;
        call(ctx, "bindTexture", &[TEXTURE_CUBE_MAP.into(), GlValue::Null])?;
        call(ctx, "bindTexture", &[TEXTURE_2D.into(), GlValue::Null])?;
        if webgl2 {
            call(ctx, "bindTexture", &[TEXTURE_2D_ARRAY.into(), GlValue::Null])?;
            call(ctx, "bindTexture", &[TEXTURE_3D.into(), GlValue::Null])?;
            call(ctx, "bindSampler", &[unit.into(), GlValue::Null])?;
        }
    }

    call(ctx, "activeTexture", &[TEXTURE0.into()])?;
    call(ctx, "useProgram", &[GlValue::Null])?;
    call(ctx, "bindBuffer", &[ARRAY_BUFFER.into(), GlValue::Null])?;
    call(ctx, "bindBuffer", &[ELEMENT_ARRAY_BUFFER.into(), GlValue::Null])?;
    call(ctx, "bindFramebuffer", &[FRAMEBUFFER.into(), GlValue::Null])?;
    call(ctx, "bindRenderbuffer", &[RENDERBUFFER.into(), GlValue::Null])?;
    call(ctx, "disable", &[BLEND.into()])?;
    call(ctx, "disable", &[CULL_FACE.into()])?;
    call(ctx, "disable", &[DEPTH_TEST.into()])?;
    call(ctx, "disable", &[DITHER.into()])?;
    call(ctx, "disable", &[SCISSOR_TEST.into()])?;
    call(
        ctx,
        "blendColor",
        &[0.0.into(), 0.0.into(), 0.0.into(), 0.0.into()],
    )?;
    call(ctx, "blendEquation", &[FUNC_ADD.into()])?;
    call(ctx, "blendFunc", &[ONE.into(), ZERO.into()])?;
    call(
        ctx,
        "clearColor",
        &[0.0.into(), 0.0.into(), 0.0.into(), 0.0.into()],
    )?;
    call(ctx, "clearDepth", &[1.0.into()])?;
    call(ctx, "clearStencil", &[(-1).into()])?;
    call(
        ctx,
        "colorMask",
        &[true.into(), true.into(), true.into(), true.into()],
    )?;
    call(ctx, "cullFace", &[BACK.into()])?;
    call(ctx, "depthFunc", &[LESS.into()])?;
    call(ctx, "depthMask", &[true.into()])?;
    call(ctx, "depthRange", &[0.0.into(), 1.0.into()])?;
    call(ctx, "frontFace", &[CCW.into()])?;
    call(
        ctx,
        "hint",
        &[GENERATE_MIPMAP_HINT.into(), DONT_CARE.into()],
    )?;
    call(ctx, "lineWidth", &[1.0.into()])?;
    call(ctx, "pixelStorei", &[PACK_ALIGNMENT.into(), 4.into()])?;
    call(ctx, "pixelStorei", &[UNPACK_ALIGNMENT.into(), 4.into()])?;
    call(
        ctx,
        "pixelStorei",
        &[
            UNPACK_COLORSPACE_CONVERSION_WEBGL.into(),
            BROWSER_DEFAULT_WEBGL.into(),
        ],
    )?;
    call(
        ctx,
        "pixelStorei",
        &[UNPACK_FLIP_Y_WEBGL.into(), false.into()],
    )?;
    call(
        ctx,
        "pixelStorei",
        &[UNPACK_PREMULTIPLY_ALPHA_WEBGL.into(), false.into()],
    )?;
    call(ctx, "polygonOffset", &[0.0.into(), 0.0.into()])?;
    call(ctx, "sampleCoverage", &[1.0.into(), false.into()])?;

    let (width, height) = ctx.drawing_buffer_size();
    call(
        ctx,
        "scissor",
        &[0.into(), 0.into(), width.into(), height.into()],
    )?;
    call(
        ctx,
        "stencilFunc",
        &[ALWAYS.into(), 0.into(), 0xFFFF_FFFFu32.into()],
    )?;
    call(ctx, "stencilMask", &[0xFFFF_FFFFu32.into()])?;
    call(
        ctx,
        "stencilOp",
        &[KEEP.into(), KEEP.into(), KEEP.into()],
    )?;
    call(
        ctx,
        "viewport",
        &[0.into(), 0.into(), width.into(), height.into()],
    )?;
    call(
        ctx,
        "clear",
        &[(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT | STENCIL_BUFFER_BIT).into()],
    )?;

    if webgl2 {
        call(ctx, "drawBuffers", &[GlValue::Array(vec![BACK.into()])])?;
        call(ctx, "readBuffer", &[BACK.into()])?;
        call(ctx, "bindBuffer", &[COPY_READ_BUFFER.into(), GlValue::Null])?;
        call(ctx, "bindBuffer", &[COPY_WRITE_BUFFER.into(), GlValue::Null])?;
        call(ctx, "bindBuffer", &[PIXEL_PACK_BUFFER.into(), GlValue::Null])?;
        call(ctx, "bindBuffer", &[PIXEL_UNPACK_BUFFER.into(), GlValue::Null])?;
        call(
            ctx,
            "bindBuffer",
            &[TRANSFORM_FEEDBACK_BUFFER.into(), GlValue::Null],
        )?;
        call(ctx, "bindBuffer", &[UNIFORM_BUFFER.into(), GlValue::Null])?;
    }

    while ctx.poll_error() != NO_ERROR {}

    Ok(())
}

fn call<C: RenderingContext>(ctx: &mut C, name: &str, args: &[GlValue]) -> Result<(), CallError> {
    query(ctx, name, args).map(|_| ())
}

fn query<C: RenderingContext>(
    ctx: &mut C,
    name: &str,
    args: &[GlValue],
) -> Result<GlValue, CallError> {
    if !signatures::supports(ctx.api(), name) {
        return Ok(GlValue::Null);
    }
    match ctx.invoke(name, args) {
        Ok(value) => Ok(value),
        Err(CallError::UnknownOperation(_)) => Ok(GlValue::Null),
        Err(err) => Err(err),
    }
}
