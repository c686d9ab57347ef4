//! Signature-driven argument rendering.
//!
//! Positions with a declared role render through the enum registry; positions a known
//! overload leaves unlisted are plain values and render verbatim. Only when the signature
//! table has no entry for the call shape at all (an operation or overload newer than the
//! table) does the formatter fall back to guessing: integers that happen to match a known
//! constant render with the candidate name attached, visibly marked as a guess, so the
//! output stays honest about its own confidence.

use webgl_constants::signatures::{signature, ArgRole};
use webgl_constants::ApiVersion;

use crate::error::Result;
use crate::registry::EnumRegistry;
use crate::value::GlValue;

/// Renders one argument of `function_name` the way the signature table says it should read.
///
/// `num_args` is the total argument count of the call, which is what selects the overload.
pub fn format_call_argument(
    api: ApiVersion,
    function_name: &str,
    num_args: usize,
    index: usize,
    value: &GlValue,
) -> Result<String> {
    let registry = EnumRegistry::get(api)?;
    Ok(argument_with(registry, function_name, num_args, index, value))
}

/// Renders a full argument list, parenthesized and joined with `", "`.
pub fn format_call_arguments(
    api: ApiVersion,
    function_name: &str,
    args: &[GlValue],
) -> Result<String> {
    let registry = EnumRegistry::get(api)?;
    Ok(arguments_with(registry, function_name, args))
}

pub(crate) fn argument_with(
    registry: &EnumRegistry,
    function_name: &str,
    num_args: usize,
    index: usize,
    value: &GlValue,
) -> String {
    let overload = signature(registry.api(), function_name).and_then(|op| op.overload(num_args));
    match overload {
        Some(overload) => match overload.role(index) {
            Some(ArgRole::Enum) => enum_name(registry, value),
            Some(ArgRole::EnumArray) => enum_array(registry, value),
            Some(ArgRole::Bitfield(bits)) => bitfield(registry, bits, value),
            None => value.to_string(),
        },
        // Unknown call shape: the table trails the API revision, so guess.
        None => guessed(registry, value),
    }
}

pub(crate) fn arguments_with(
    registry: &EnumRegistry,
    function_name: &str,
    args: &[GlValue],
) -> String {
    let rendered: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(index, value)| argument_with(registry, function_name, args.len(), index, value))
        .collect();
    format!("({})", rendered.join(", "))
}

fn enum_name(registry: &EnumRegistry, value: &GlValue) -> String {
    match value.as_gl_enum() {
        Some(raw) => registry.name_of(raw),
        None => value.to_string(),
    }
}

fn enum_array(registry: &EnumRegistry, value: &GlValue) -> String {
    let GlValue::Array(items) = value else {
        return value.to_string();
    };
    let rendered: Vec<String> = items.iter().map(|item| enum_name(registry, item)).collect();
    format!("[{}]", rendered.join(", "))
}

fn bitfield(registry: &EnumRegistry, bits: &[&'static str], value: &GlValue) -> String {
    let Some(raw) = value.as_gl_enum() else {
        return value.to_string();
    };
    if raw == 0 {
        return "0".to_owned();
    }
    let mut names = Vec::new();
    let mut reconstructed = 0;
    for bit_name in bits {
        let Some(bit) = registry.value_of(bit_name) else {
            continue;
        };
        if raw & bit != 0 {
            names.push(*bit_name);
            reconstructed |= bit;
        }
    }
    if reconstructed == raw {
        names.join(" | ")
    } else {
        // Bits outside the named set: show the raw value instead of a partial decomposition.
        registry.name_of(raw)
    }
}

fn guessed(registry: &EnumRegistry, value: &GlValue) -> String {
    match value {
        GlValue::Int(_) => match value.as_gl_enum() {
            Some(raw) if registry.is_known(raw) => {
                format!("{raw} /* {}? */", registry.name_of(raw))
            }
            _ => value.to_string(),
        },
        GlValue::Array(items) => {
            let rendered: Vec<String> = items.iter().map(|item| guessed(registry, item)).collect();
            format!("[{}]", rendered.join(", "))
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::initialize;
    use pretty_assertions::assert_eq;
    use webgl_constants as gl;

    fn fmt1(function_name: &str, args: &[GlValue]) -> String {
        format_call_arguments(ApiVersion::WebGl1, function_name, args).unwrap()
    }

    #[test]
    fn declared_enum_positions_use_symbolic_names() {
        initialize(ApiVersion::WebGl1);
        assert_eq!(
            fmt1(
                "bindTexture",
                &[gl::TEXTURE_2D.into(), GlValue::Null],
            ),
            "(TEXTURE_2D, null)"
        );
        assert_eq!(
            fmt1(
                "drawElements",
                &[
                    gl::TRIANGLES.into(),
                    6.into(),
                    gl::UNSIGNED_SHORT.into(),
                    0.into(),
                ],
            ),
            "(TRIANGLES, 6, UNSIGNED_SHORT, 0)"
        );
    }

    #[test]
    fn overloads_are_selected_by_argument_count() {
        initialize(ApiVersion::WebGl1);
        // Six-argument form: position 3 is the source format.
        let arg = format_call_argument(
            ApiVersion::WebGl1,
            "texImage2D",
            6,
            3,
            &gl::RGBA.into(),
        )
        .unwrap();
        assert_eq!(arg, "RGBA");
        // Nine-argument form: position 3 is a width and stays numeric.
        let arg = format_call_argument(
            ApiVersion::WebGl1,
            "texImage2D",
            9,
            3,
            &256.into(),
        )
        .unwrap();
        assert_eq!(arg, "256");
    }

    #[test]
    fn bitfields_decompose_into_named_bits() {
        initialize(ApiVersion::WebGl1);
        let mask = gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT;
        assert_eq!(
            fmt1("clear", &[mask.into()]),
            "(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT)"
        );
        assert_eq!(fmt1("clear", &[0u32.into()]), "(0)");
        // A stray bit outside the named set defeats the decomposition.
        assert_eq!(fmt1("clear", &[(gl::COLOR_BUFFER_BIT | 0x8).into()]), "(16392)");
    }

    #[test]
    fn enum_arrays_render_bracketed() {
        initialize(ApiVersion::WebGl2);
        let buffers = GlValue::Array(vec![
            gl::COLOR_ATTACHMENT0.into(),
            gl::COLOR_ATTACHMENT1.into(),
        ]);
        assert_eq!(
            format_call_arguments(ApiVersion::WebGl2, "drawBuffers", &[buffers]).unwrap(),
            "([COLOR_ATTACHMENT0, COLOR_ATTACHMENT1])"
        );
    }

    #[test]
    fn unknown_call_shapes_guess_and_mark_the_guess() {
        initialize(ApiVersion::WebGl1);
        // A WebGL 2.0 operation seen through a 1.0 table: every integer that matches a known
        // constant renders with its candidate name attached.
        assert_eq!(
            fmt1("texStorage2D", &[gl::TEXTURE_2D.into(), 1.into()]),
            "(3553 /* TEXTURE_2D? */, 1 /* LINES | ONE? */)"
        );
        // Integers that match nothing stay verbatim.
        assert_eq!(fmt1("texStorage2D", &[9.into()]), "(9)");
    }

    #[test]
    fn strings_and_objects_render_generically() {
        initialize(ApiVersion::WebGl1);
        use crate::value::{GlObject, ObjectKind};
        assert_eq!(
            fmt1(
                "shaderSource",
                &[
                    GlObject::new(ObjectKind::Shader, 7).into(),
                    "void main() {}".into(),
                ],
            ),
            "(WebGLShader(7), \"void main() {}\")"
        );
    }

}
