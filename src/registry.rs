//! Enum name tables, built once per API revision.

use std::collections::HashMap;
use std::sync::OnceLock;

use webgl_constants::{ApiVersion, GlEnum};

use crate::error::{DebugError, Result};

static WEBGL1_REGISTRY: OnceLock<EnumRegistry> = OnceLock::new();
static WEBGL2_REGISTRY: OnceLock<EnumRegistry> = OnceLock::new();

fn cell(api: ApiVersion) -> &'static OnceLock<EnumRegistry> {
    match api {
        ApiVersion::WebGl1 => &WEBGL1_REGISTRY,
        ApiVersion::WebGl2 => &WEBGL2_REGISTRY,
    }
}

/// Builds the registry for `api` from the published constant tables.
///
/// Repeated calls are no-ops that return the registry already built. The tables live for the
/// process lifetime and are immutable once constructed.
pub fn initialize(api: ApiVersion) -> &'static EnumRegistry {
    cell(api).get_or_init(|| EnumRegistry::build(api))
}

/// Renders `value` as its symbolic constant name for `api`.
///
/// Fails with [`DebugError::RegistryUninitialized`] until [`initialize`] has run for that
/// revision.
pub fn gl_enum_to_string(api: ApiVersion, value: GlEnum) -> Result<String> {
    Ok(EnumRegistry::get(api)?.name_of(value))
}

/// Whether `value` matches any constant `api` declares.
pub fn might_be_enum(api: ApiVersion, value: GlEnum) -> Result<bool> {
    Ok(EnumRegistry::get(api)?.is_known(value))
}

/// Value and name lookups over one API revision's constant tables.
///
/// The `&'static` reference handed out by [`EnumRegistry::get`] doubles as the proof that
/// [`initialize`] has run, so lookups on it are infallible.
pub struct EnumRegistry {
    api: ApiVersion,
    names_by_value: HashMap<GlEnum, Vec<&'static str>>,
    values_by_name: HashMap<&'static str, GlEnum>,
}

impl EnumRegistry {
    /// Fetches the registry for `api`, failing fast when [`initialize`] has not run.
    ///
    /// Degraded name output is worse than no output here: a caller reading half-built debug
    /// strings would take them for ground truth.
    pub fn get(api: ApiVersion) -> Result<&'static Self> {
        cell(api)
            .get()
            .ok_or(DebugError::RegistryUninitialized(api))
    }

    fn build(api: ApiVersion) -> Self {
        let mut names_by_value: HashMap<GlEnum, Vec<&'static str>> = HashMap::new();
        let mut values_by_name = HashMap::new();
        for table in api.constant_tables() {
            for (name, value) in *table {
                names_by_value.entry(*value).or_default().push(*name);
                values_by_name.insert(*name, *value);
            }
        }
        Self {
            api,
            names_by_value,
            values_by_name,
        }
    }

    pub fn api(&self) -> ApiVersion {
        self.api
    }

    /// Symbolic rendering of a raw enum value.
    ///
    /// A value with exactly one name renders bare. Values shared by several names render as
    /// all of them joined with `" | "` in table order, so the reader sees every candidate
    /// instead of an arbitrarily chosen one. Unknown values render as their decimal string.
    pub fn name_of(&self, value: GlEnum) -> String {
        match self.names_by_value.get(&value) {
            Some(names) if names.len() == 1 => names[0].to_owned(),
            Some(names) => names.join(" | "),
            None => value.to_string(),
        }
    }

    /// Whether `value` is a constant this API revision declares.
    pub fn is_known(&self, value: GlEnum) -> bool {
        self.names_by_value.contains_key(&value)
    }

    /// Raw value of a named constant.
    pub fn value_of(&self, name: &str) -> Option<GlEnum> {
        self.values_by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_reuses_the_same_tables() {
        let first = initialize(ApiVersion::WebGl1);
        let second = initialize(ApiVersion::WebGl1);
        assert!(std::ptr::eq(first, second));
        assert_eq!(
            first.names_by_value.len(),
            second.names_by_value.len(),
            "rebuild must not duplicate entries"
        );
    }

    #[test]
    fn unique_values_render_bare() {
        let registry = initialize(ApiVersion::WebGl1);
        assert_eq!(registry.name_of(0x0DE1), "TEXTURE_2D");
        assert_eq!(registry.name_of(0x0500), "INVALID_ENUM");
    }

    #[test]
    fn shared_values_render_every_candidate_in_table_order() {
        let registry = initialize(ApiVersion::WebGl1);
        assert_eq!(registry.name_of(0), "POINTS | ZERO | NO_ERROR | NONE");
        assert_eq!(registry.name_of(1), "LINES | ONE");
        assert_eq!(registry.name_of(0x8009), "BLEND_EQUATION | BLEND_EQUATION_RGB");
    }

    #[test]
    fn unknown_values_render_as_decimal() {
        let registry = initialize(ApiVersion::WebGl1);
        assert_eq!(registry.name_of(0x9999), "39321");
    }

    #[test]
    fn webgl2_tables_layer_on_webgl1() {
        let registry = initialize(ApiVersion::WebGl2);
        assert_eq!(registry.name_of(0x0DE1), "TEXTURE_2D");
        assert_eq!(registry.name_of(0x8F36), "COPY_READ_BUFFER | COPY_READ_BUFFER_BINDING");
        // The same value is not a WebGL 1.0 constant at all.
        assert_eq!(initialize(ApiVersion::WebGl1).name_of(0x8F36), "36662");
    }

    #[test]
    fn known_values_and_names_round_trip() {
        let registry = initialize(ApiVersion::WebGl1);
        assert!(registry.is_known(0x0DE1));
        assert!(!registry.is_known(0x9999));
        assert_eq!(registry.value_of("COLOR_BUFFER_BIT"), Some(0x4000));
        assert_eq!(registry.value_of("READ_BUFFER"), None);
    }
}
