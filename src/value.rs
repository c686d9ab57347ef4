//! Dynamic values crossing the context call surface.
//!
//! Arguments and return values are carried as [`GlValue`] so the wrappers can intercept any
//! operation without knowing its concrete shape. The `Display` impl is the generic rendering
//! used for argument positions with no declared enum role; enum-aware rendering lives in
//! [`crate::format`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// One argument or return value on the call surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum GlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<GlValue>),
    Object(GlObject),
    /// Bulk payload (buffer source, pixel upload). Only the length is retained.
    Data { len: usize },
}

impl GlValue {
    /// The value as a `u32` enum candidate, when it is an integer in range.
    pub fn as_gl_enum(&self) -> Option<u32> {
        match self {
            GlValue::Int(raw) => u32::try_from(*raw).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GlValue::Int(raw) => Some(*raw),
            _ => None,
        }
    }
}

impl fmt::Display for GlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlValue::Null => f.write_str("null"),
            GlValue::Bool(value) => write!(f, "{value}"),
            GlValue::Int(value) => write!(f, "{value}"),
            GlValue::Float(value) => write!(f, "{value}"),
            GlValue::Str(value) => write!(f, "{value:?}"),
            GlValue::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            GlValue::Object(object) => write!(f, "{object}"),
            GlValue::Data { len } => write!(f, "<{len} bytes>"),
        }
    }
}

impl From<bool> for GlValue {
    fn from(value: bool) -> Self {
        GlValue::Bool(value)
    }
}

impl From<i32> for GlValue {
    fn from(value: i32) -> Self {
        GlValue::Int(value.into())
    }
}

impl From<i64> for GlValue {
    fn from(value: i64) -> Self {
        GlValue::Int(value)
    }
}

impl From<u32> for GlValue {
    fn from(value: u32) -> Self {
        GlValue::Int(value.into())
    }
}

impl From<f32> for GlValue {
    fn from(value: f32) -> Self {
        GlValue::Float(value.into())
    }
}

impl From<f64> for GlValue {
    fn from(value: f64) -> Self {
        GlValue::Float(value)
    }
}

impl From<&str> for GlValue {
    fn from(value: &str) -> Self {
        GlValue::Str(value.to_owned())
    }
}

impl From<String> for GlValue {
    fn from(value: String) -> Self {
        GlValue::Str(value)
    }
}

impl From<GlObject> for GlValue {
    fn from(value: GlObject) -> Self {
        GlValue::Object(value)
    }
}

impl From<Vec<GlValue>> for GlValue {
    fn from(values: Vec<GlValue>) -> Self {
        GlValue::Array(values)
    }
}

/// Opaque handle to a context-owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlObject {
    pub kind: ObjectKind,
    pub id: u64,
}

impl GlObject {
    pub fn new(kind: ObjectKind, id: u64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for GlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.class_name(), self.id)
    }
}

/// Resource classes a context can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Buffer,
    Framebuffer,
    Program,
    Renderbuffer,
    Shader,
    Texture,
    Query,
    Sampler,
    Sync,
    TransformFeedback,
    VertexArray,
    UniformLocation,
}

impl ObjectKind {
    /// Host-visible class name for the handle.
    pub fn class_name(self) -> &'static str {
        match self {
            ObjectKind::Buffer => "WebGLBuffer",
            ObjectKind::Framebuffer => "WebGLFramebuffer",
            ObjectKind::Program => "WebGLProgram",
            ObjectKind::Renderbuffer => "WebGLRenderbuffer",
            ObjectKind::Shader => "WebGLShader",
            ObjectKind::Texture => "WebGLTexture",
            ObjectKind::Query => "WebGLQuery",
            ObjectKind::Sampler => "WebGLSampler",
            ObjectKind::Sync => "WebGLSync",
            ObjectKind::TransformFeedback => "WebGLTransformFeedback",
            ObjectKind::VertexArray => "WebGLVertexArrayObject",
            ObjectKind::UniformLocation => "WebGLUniformLocation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_rendering_matches_host_conventions() {
        assert_eq!(GlValue::Null.to_string(), "null");
        assert_eq!(GlValue::Bool(true).to_string(), "true");
        assert_eq!(GlValue::Int(-3).to_string(), "-3");
        assert_eq!(GlValue::Float(0.5).to_string(), "0.5");
        assert_eq!(GlValue::Float(4.0).to_string(), "4");
        assert_eq!(GlValue::from("main").to_string(), "\"main\"");
        assert_eq!(GlValue::Data { len: 64 }.to_string(), "<64 bytes>");
        assert_eq!(
            GlValue::Object(GlObject::new(ObjectKind::Buffer, 3)).to_string(),
            "WebGLBuffer(3)"
        );
        assert_eq!(
            GlValue::Array(vec![GlValue::Int(1), GlValue::Null]).to_string(),
            "[1, null]"
        );
    }

    #[test]
    fn enum_candidates_are_integers_in_u32_range() {
        assert_eq!(GlValue::Int(0x0DE1).as_gl_enum(), Some(0x0DE1));
        assert_eq!(GlValue::Int(-1).as_gl_enum(), None);
        assert_eq!(GlValue::Int(1 << 40).as_gl_enum(), None);
        assert_eq!(GlValue::Float(4.0).as_gl_enum(), None);
    }
}
