//! Call signatures for the WebGL operation surface.
//!
//! Every operation an application can invoke on a context is declared here with its argument
//! counts and the argument positions that carry enum values. Overloads are told apart by total
//! argument count, which is how the published IDL distinguishes them. Positions without a
//! declared role hold plain values (numbers, booleans, objects, buffers, strings).
//!
//! Error polling is deliberately absent from these tables: it is the side channel the debug
//! wrapper owns, not an operation to be intercepted.

use crate::ApiVersion;

/// How one argument position should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRole {
    /// A single enum value.
    Enum,
    /// A sequence of enum values.
    EnumArray,
    /// A mask assembled by OR-ing the named bits together.
    Bitfield(&'static [&'static str]),
}

/// One callable shape of an operation, selected by total argument count.
#[derive(Debug, Clone, Copy)]
pub struct Overload {
    pub arg_count: usize,
    /// Positions with a declared role. Unlisted positions hold plain values.
    pub roles: &'static [(usize, ArgRole)],
}

impl Overload {
    pub fn role(&self, index: usize) -> Option<ArgRole> {
        self.roles
            .iter()
            .find(|(position, _)| *position == index)
            .map(|(_, role)| *role)
    }
}

/// An operation plus every overload the API version declares for it.
#[derive(Debug, Clone, Copy)]
pub struct OpSignature {
    pub name: &'static str,
    pub overloads: &'static [Overload],
}

impl OpSignature {
    pub fn overload(&self, arg_count: usize) -> Option<&'static Overload> {
        self.overloads
            .iter()
            .find(|overload| overload.arg_count == arg_count)
    }
}

/// Looks up an operation's signature as visible to `api`.
///
/// WebGL 2.0 redeclares a handful of 1.0 operations with extra overloads; those entries shadow
/// the 1.0 ones wholesale, so a hit in the 2.0 table already carries the full overload set.
pub fn signature(api: ApiVersion, name: &str) -> Option<&'static OpSignature> {
    let find = |table: &'static [OpSignature]| table.iter().find(|op| op.name == name);
    match api {
        ApiVersion::WebGl1 => find(WEBGL1_OPS),
        ApiVersion::WebGl2 => find(WEBGL2_OPS).or_else(|| find(WEBGL1_OPS)),
    }
}

/// Whether `api` declares an operation at all.
pub fn supports(api: ApiVersion, name: &str) -> bool {
    signature(api, name).is_some()
}

const fn op(name: &'static str, overloads: &'static [Overload]) -> OpSignature {
    OpSignature { name, overloads }
}

const fn ov(arg_count: usize, roles: &'static [(usize, ArgRole)]) -> Overload {
    Overload { arg_count, roles }
}

const fn e(index: usize) -> (usize, ArgRole) {
    (index, ArgRole::Enum)
}

const fn ea(index: usize) -> (usize, ArgRole) {
    (index, ArgRole::EnumArray)
}

const fn bits(index: usize, names: &'static [&'static str]) -> (usize, ArgRole) {
    (index, ArgRole::Bitfield(names))
}

const BUFFER_MASK_BITS: &[&str] = &["COLOR_BUFFER_BIT", "DEPTH_BUFFER_BIT", "STENCIL_BUFFER_BIT"];
const SYNC_FLAG_BITS: &[&str] = &["SYNC_FLUSH_COMMANDS_BIT"];

/// Every WebGL 1.0 operation.
pub static WEBGL1_OPS: &[OpSignature] = &[
    // Context queries
    op("getContextAttributes", &[ov(0, &[])]),
    op("isContextLost", &[ov(0, &[])]),
    op("getSupportedExtensions", &[ov(0, &[])]),
    op("getExtension", &[ov(1, &[])]),
    // Viewing and state
    op("enable", &[ov(1, &[e(0)])]),
    op("disable", &[ov(1, &[e(0)])]),
    op("isEnabled", &[ov(1, &[e(0)])]),
    op("getParameter", &[ov(1, &[e(0)])]),
    op("hint", &[ov(2, &[e(0), e(1)])]),
    op("lineWidth", &[ov(1, &[])]),
    op("polygonOffset", &[ov(2, &[])]),
    op("sampleCoverage", &[ov(2, &[])]),
    op("viewport", &[ov(4, &[])]),
    op("scissor", &[ov(4, &[])]),
    // Culling
    op("cullFace", &[ov(1, &[e(0)])]),
    op("frontFace", &[ov(1, &[e(0)])]),
    // Framebuffer operations
    op("clear", &[ov(1, &[bits(0, BUFFER_MASK_BITS)])]),
    op("clearColor", &[ov(4, &[])]),
    op("clearDepth", &[ov(1, &[])]),
    op("clearStencil", &[ov(1, &[])]),
    op("colorMask", &[ov(4, &[])]),
    op("depthFunc", &[ov(1, &[e(0)])]),
    op("depthMask", &[ov(1, &[])]),
    op("depthRange", &[ov(2, &[])]),
    op("blendColor", &[ov(4, &[])]),
    op("blendEquation", &[ov(1, &[e(0)])]),
    op("blendEquationSeparate", &[ov(2, &[e(0), e(1)])]),
    op("blendFunc", &[ov(2, &[e(0), e(1)])]),
    op("blendFuncSeparate", &[ov(4, &[e(0), e(1), e(2), e(3)])]),
    op("stencilFunc", &[ov(3, &[e(0)])]),
    op("stencilFuncSeparate", &[ov(4, &[e(0), e(1)])]),
    op("stencilMask", &[ov(1, &[])]),
    op("stencilMaskSeparate", &[ov(2, &[e(0)])]),
    op("stencilOp", &[ov(3, &[e(0), e(1), e(2)])]),
    op("stencilOpSeparate", &[ov(4, &[e(0), e(1), e(2), e(3)])]),
    // Buffer objects
    op("createBuffer", &[ov(0, &[])]),
    op("deleteBuffer", &[ov(1, &[])]),
    op("isBuffer", &[ov(1, &[])]),
    op("bindBuffer", &[ov(2, &[e(0)])]),
    op("bufferData", &[ov(3, &[e(0), e(2)])]),
    op("bufferSubData", &[ov(3, &[e(0)])]),
    op("getBufferParameter", &[ov(2, &[e(0), e(1)])]),
    // Framebuffer objects
    op("createFramebuffer", &[ov(0, &[])]),
    op("deleteFramebuffer", &[ov(1, &[])]),
    op("isFramebuffer", &[ov(1, &[])]),
    op("bindFramebuffer", &[ov(2, &[e(0)])]),
    op("checkFramebufferStatus", &[ov(1, &[e(0)])]),
    op("framebufferRenderbuffer", &[ov(4, &[e(0), e(1), e(2)])]),
    op("framebufferTexture2D", &[ov(5, &[e(0), e(1), e(2)])]),
    op(
        "getFramebufferAttachmentParameter",
        &[ov(3, &[e(0), e(1), e(2)])],
    ),
    // Renderbuffer objects
    op("createRenderbuffer", &[ov(0, &[])]),
    op("deleteRenderbuffer", &[ov(1, &[])]),
    op("isRenderbuffer", &[ov(1, &[])]),
    op("bindRenderbuffer", &[ov(2, &[e(0)])]),
    op("getRenderbufferParameter", &[ov(2, &[e(0), e(1)])]),
    op("renderbufferStorage", &[ov(4, &[e(0), e(1)])]),
    // Texture objects
    op("createTexture", &[ov(0, &[])]),
    op("deleteTexture", &[ov(1, &[])]),
    op("isTexture", &[ov(1, &[])]),
    op("bindTexture", &[ov(2, &[e(0)])]),
    op("activeTexture", &[ov(1, &[e(0)])]),
    op("generateMipmap", &[ov(1, &[e(0)])]),
    op("getTexParameter", &[ov(2, &[e(0), e(1)])]),
    op("texParameterf", &[ov(3, &[e(0), e(1)])]),
    op("texParameteri", &[ov(3, &[e(0), e(1), e(2)])]),
    op(
        "texImage2D",
        &[
            ov(6, &[e(0), e(2), e(3), e(4)]),
            ov(9, &[e(0), e(2), e(6), e(7)]),
        ],
    ),
    op(
        "texSubImage2D",
        &[
            ov(7, &[e(0), e(4), e(5)]),
            ov(9, &[e(0), e(6), e(7)]),
        ],
    ),
    op("copyTexImage2D", &[ov(8, &[e(0), e(2)])]),
    op("copyTexSubImage2D", &[ov(8, &[e(0)])]),
    op("compressedTexImage2D", &[ov(7, &[e(0), e(2)])]),
    op("compressedTexSubImage2D", &[ov(8, &[e(0), e(6)])]),
    // Pixel transfer
    op("pixelStorei", &[ov(2, &[e(0), e(1)])]),
    op("readPixels", &[ov(7, &[e(4), e(5)])]),
    // Programs and shaders
    op("createProgram", &[ov(0, &[])]),
    op("deleteProgram", &[ov(1, &[])]),
    op("isProgram", &[ov(1, &[])]),
    op("createShader", &[ov(1, &[e(0)])]),
    op("deleteShader", &[ov(1, &[])]),
    op("isShader", &[ov(1, &[])]),
    op("attachShader", &[ov(2, &[])]),
    op("detachShader", &[ov(2, &[])]),
    op("getAttachedShaders", &[ov(1, &[])]),
    op("shaderSource", &[ov(2, &[])]),
    op("compileShader", &[ov(1, &[])]),
    op("getShaderParameter", &[ov(2, &[e(1)])]),
    op("getShaderInfoLog", &[ov(1, &[])]),
    op("getShaderSource", &[ov(1, &[])]),
    op("getShaderPrecisionFormat", &[ov(2, &[e(0), e(1)])]),
    op("linkProgram", &[ov(1, &[])]),
    op("useProgram", &[ov(1, &[])]),
    op("validateProgram", &[ov(1, &[])]),
    op("getProgramParameter", &[ov(2, &[e(1)])]),
    op("getProgramInfoLog", &[ov(1, &[])]),
    // Uniforms and attributes
    op("getActiveAttrib", &[ov(2, &[])]),
    op("getActiveUniform", &[ov(2, &[])]),
    op("getAttribLocation", &[ov(2, &[])]),
    op("getUniform", &[ov(2, &[])]),
    op("getUniformLocation", &[ov(2, &[])]),
    op("bindAttribLocation", &[ov(3, &[])]),
    op("uniform1f", &[ov(2, &[])]),
    op("uniform2f", &[ov(3, &[])]),
    op("uniform3f", &[ov(4, &[])]),
    op("uniform4f", &[ov(5, &[])]),
    op("uniform1i", &[ov(2, &[])]),
    op("uniform2i", &[ov(3, &[])]),
    op("uniform3i", &[ov(4, &[])]),
    op("uniform4i", &[ov(5, &[])]),
    op("uniform1fv", &[ov(2, &[])]),
    op("uniform2fv", &[ov(2, &[])]),
    op("uniform3fv", &[ov(2, &[])]),
    op("uniform4fv", &[ov(2, &[])]),
    op("uniform1iv", &[ov(2, &[])]),
    op("uniform2iv", &[ov(2, &[])]),
    op("uniform3iv", &[ov(2, &[])]),
    op("uniform4iv", &[ov(2, &[])]),
    op("uniformMatrix2fv", &[ov(3, &[])]),
    op("uniformMatrix3fv", &[ov(3, &[])]),
    op("uniformMatrix4fv", &[ov(3, &[])]),
    op("getVertexAttrib", &[ov(2, &[e(1)])]),
    op("getVertexAttribOffset", &[ov(2, &[e(1)])]),
    op("enableVertexAttribArray", &[ov(1, &[])]),
    op("disableVertexAttribArray", &[ov(1, &[])]),
    op("vertexAttrib1f", &[ov(2, &[])]),
    op("vertexAttrib2f", &[ov(3, &[])]),
    op("vertexAttrib3f", &[ov(4, &[])]),
    op("vertexAttrib4f", &[ov(5, &[])]),
    op("vertexAttrib1fv", &[ov(2, &[])]),
    op("vertexAttrib2fv", &[ov(2, &[])]),
    op("vertexAttrib3fv", &[ov(2, &[])]),
    op("vertexAttrib4fv", &[ov(2, &[])]),
    op("vertexAttribPointer", &[ov(6, &[e(2)])]),
    // Drawing
    op("drawArrays", &[ov(3, &[e(0)])]),
    op("drawElements", &[ov(4, &[e(0), e(2)])]),
    op("finish", &[ov(0, &[])]),
    op("flush", &[ov(0, &[])]),
];

/// Operations WebGL 2.0 adds, plus 1.0 operations it redeclares with extra overloads.
pub static WEBGL2_OPS: &[OpSignature] = &[
    // Buffer objects
    op(
        "bufferData",
        &[
            ov(3, &[e(0), e(2)]),
            ov(4, &[e(0), e(2)]),
            ov(5, &[e(0), e(2)]),
        ],
    ),
    op(
        "bufferSubData",
        &[ov(3, &[e(0)]), ov(4, &[e(0)]), ov(5, &[e(0)])],
    ),
    op("copyBufferSubData", &[ov(5, &[e(0), e(1)])]),
    op(
        "getBufferSubData",
        &[ov(3, &[e(0)]), ov(4, &[e(0)]), ov(5, &[e(0)])],
    ),
    // Framebuffer objects
    op(
        "blitFramebuffer",
        &[ov(10, &[bits(8, BUFFER_MASK_BITS), e(9)])],
    ),
    op("framebufferTextureLayer", &[ov(5, &[e(0), e(1)])]),
    op("invalidateFramebuffer", &[ov(2, &[e(0), ea(1)])]),
    op("invalidateSubFramebuffer", &[ov(6, &[e(0), ea(1)])]),
    op("readBuffer", &[ov(1, &[e(0)])]),
    // Renderbuffer objects
    op(
        "getInternalformatParameter",
        &[ov(3, &[e(0), e(1), e(2)])],
    ),
    op(
        "renderbufferStorageMultisample",
        &[ov(5, &[e(0), e(2)])],
    ),
    // Texture objects
    op("texStorage2D", &[ov(5, &[e(0), e(2)])]),
    op("texStorage3D", &[ov(6, &[e(0), e(2)])]),
    op(
        "texImage2D",
        &[
            ov(6, &[e(0), e(2), e(3), e(4)]),
            ov(9, &[e(0), e(2), e(6), e(7)]),
            ov(10, &[e(0), e(2), e(6), e(7)]),
        ],
    ),
    op(
        "texSubImage2D",
        &[
            ov(7, &[e(0), e(4), e(5)]),
            ov(9, &[e(0), e(6), e(7)]),
            ov(10, &[e(0), e(6), e(7)]),
        ],
    ),
    op(
        "texImage3D",
        &[
            ov(10, &[e(0), e(2), e(7), e(8)]),
            ov(11, &[e(0), e(2), e(7), e(8)]),
        ],
    ),
    op(
        "texSubImage3D",
        &[
            ov(11, &[e(0), e(8), e(9)]),
            ov(12, &[e(0), e(8), e(9)]),
        ],
    ),
    op("copyTexSubImage3D", &[ov(9, &[e(0)])]),
    op(
        "compressedTexImage2D",
        &[
            ov(7, &[e(0), e(2)]),
            ov(8, &[e(0), e(2)]),
            ov(9, &[e(0), e(2)]),
        ],
    ),
    op(
        "compressedTexSubImage2D",
        &[
            ov(8, &[e(0), e(6)]),
            ov(9, &[e(0), e(6)]),
            ov(10, &[e(0), e(6)]),
        ],
    ),
    op(
        "compressedTexImage3D",
        &[
            ov(8, &[e(0), e(2)]),
            ov(9, &[e(0), e(2)]),
            ov(10, &[e(0), e(2)]),
        ],
    ),
    op(
        "compressedTexSubImage3D",
        &[
            ov(10, &[e(0), e(8)]),
            ov(11, &[e(0), e(8)]),
            ov(12, &[e(0), e(8)]),
        ],
    ),
    // Pixel transfer
    op("readPixels", &[ov(7, &[e(4), e(5)]), ov(8, &[e(4), e(5)])]),
    // Programs and shaders
    op("getFragDataLocation", &[ov(2, &[])]),
    // Uniforms and attributes
    op("uniform1ui", &[ov(2, &[])]),
    op("uniform2ui", &[ov(3, &[])]),
    op("uniform3ui", &[ov(4, &[])]),
    op("uniform4ui", &[ov(5, &[])]),
    op("uniform1fv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform2fv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform3fv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform4fv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform1iv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform2iv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform3iv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform4iv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform1uiv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform2uiv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform3uiv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniform4uiv", &[ov(2, &[]), ov(3, &[]), ov(4, &[])]),
    op("uniformMatrix2fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix3fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix4fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix2x3fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix3x2fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix2x4fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix4x2fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix3x4fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("uniformMatrix4x3fv", &[ov(3, &[]), ov(4, &[]), ov(5, &[])]),
    op("vertexAttribI4i", &[ov(5, &[])]),
    op("vertexAttribI4iv", &[ov(2, &[])]),
    op("vertexAttribI4ui", &[ov(5, &[])]),
    op("vertexAttribI4uiv", &[ov(2, &[])]),
    op("vertexAttribIPointer", &[ov(5, &[e(2)])]),
    op("vertexAttribDivisor", &[ov(2, &[])]),
    // Drawing
    op("drawArraysInstanced", &[ov(4, &[e(0)])]),
    op("drawElementsInstanced", &[ov(5, &[e(0), e(2)])]),
    op("drawRangeElements", &[ov(6, &[e(0), e(4)])]),
    op("drawBuffers", &[ov(1, &[ea(0)])]),
    op("clearBufferiv", &[ov(3, &[e(0)]), ov(4, &[e(0)])]),
    op("clearBufferuiv", &[ov(3, &[e(0)]), ov(4, &[e(0)])]),
    op("clearBufferfv", &[ov(3, &[e(0)]), ov(4, &[e(0)])]),
    op("clearBufferfi", &[ov(4, &[e(0)])]),
    // Query objects
    op("createQuery", &[ov(0, &[])]),
    op("deleteQuery", &[ov(1, &[])]),
    op("isQuery", &[ov(1, &[])]),
    op("beginQuery", &[ov(2, &[e(0)])]),
    op("endQuery", &[ov(1, &[e(0)])]),
    op("getQuery", &[ov(2, &[e(0), e(1)])]),
    op("getQueryParameter", &[ov(2, &[e(1)])]),
    // Sampler objects
    op("createSampler", &[ov(0, &[])]),
    op("deleteSampler", &[ov(1, &[])]),
    op("isSampler", &[ov(1, &[])]),
    op("bindSampler", &[ov(2, &[])]),
    op("samplerParameteri", &[ov(3, &[e(1), e(2)])]),
    op("samplerParameterf", &[ov(3, &[e(1)])]),
    op("getSamplerParameter", &[ov(2, &[e(1)])]),
    // Sync objects
    op("fenceSync", &[ov(2, &[e(0)])]),
    op("isSync", &[ov(1, &[])]),
    op("deleteSync", &[ov(1, &[])]),
    op("clientWaitSync", &[ov(3, &[bits(1, SYNC_FLAG_BITS)])]),
    op("waitSync", &[ov(3, &[])]),
    op("getSyncParameter", &[ov(2, &[e(1)])]),
    // Transform feedback
    op("createTransformFeedback", &[ov(0, &[])]),
    op("deleteTransformFeedback", &[ov(1, &[])]),
    op("isTransformFeedback", &[ov(1, &[])]),
    op("bindTransformFeedback", &[ov(2, &[e(0)])]),
    op("beginTransformFeedback", &[ov(1, &[e(0)])]),
    op("endTransformFeedback", &[ov(0, &[])]),
    op("transformFeedbackVaryings", &[ov(3, &[e(2)])]),
    op("getTransformFeedbackVarying", &[ov(2, &[])]),
    op("pauseTransformFeedback", &[ov(0, &[])]),
    op("resumeTransformFeedback", &[ov(0, &[])]),
    // Uniform buffer objects
    op("bindBufferBase", &[ov(3, &[e(0)])]),
    op("bindBufferRange", &[ov(5, &[e(0)])]),
    op("getIndexedParameter", &[ov(2, &[e(0)])]),
    op("getUniformIndices", &[ov(2, &[])]),
    op("getActiveUniforms", &[ov(3, &[e(2)])]),
    op("getUniformBlockIndex", &[ov(2, &[])]),
    op("getActiveUniformBlockParameter", &[ov(3, &[e(2)])]),
    op("getActiveUniformBlockName", &[ov(2, &[])]),
    op("uniformBlockBinding", &[ov(3, &[])]),
    // Vertex array objects
    op("createVertexArray", &[ov(0, &[])]),
    op("deleteVertexArray", &[ov(1, &[])]),
    op("isVertexArray", &[ov(1, &[])]),
    op("bindVertexArray", &[ov(1, &[])]),
];
