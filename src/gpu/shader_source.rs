//! Shader source assembly
//!
//! Tuning constants live in `constants.rs` only. They are emitted as a WGSL
//! header and prepended to the embedded kernel so both backends agree.

use crate::constants::{attributes, dispatch, selection};

/// Kernel body, without the constants header
pub const FILTER_POINTS_WGSL: &str = include_str!("shaders/filter_points.wgsl");

/// WGSL `const` declarations for every value the kernel reads
pub fn constants_header() -> String {
    format!(
        "// Generated from constants.rs\n\
         const WORKGROUP_SIZE: u32 = {}u;\n\
         const LEVEL_SHIFT: u32 = {}u;\n\
         const LEVEL_MASK: u32 = {}u;\n\
         const CENTER_FALLOFF: f32 = {:?};\n\
         const MIN_CENTER_WEIGHT: f32 = {:?};\n\
         const TARGET_SPACING_DIVISOR: f32 = {:?};\n\
         const JITTER_MULTIPLIER: f32 = {:?};\n\
         const JITTER_MAX: f32 = {:?};\n",
        dispatch::WORKGROUP_SIZE,
        attributes::LEVEL_SHIFT,
        attributes::LEVEL_MASK,
        selection::CENTER_FALLOFF,
        selection::MIN_CENTER_WEIGHT,
        selection::TARGET_SPACING_DIVISOR,
        selection::JITTER_MULTIPLIER,
        selection::JITTER_MAX,
    )
}

/// Complete module source ready for `create_shader_module`
pub fn filter_points_source() -> String {
    let mut source = constants_header();
    source.push('\n');
    source.push_str(FILTER_POINTS_WGSL);
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workgroup_size_matches_dispatch() {
        let attribute = format!("@workgroup_size({})", dispatch::WORKGROUP_SIZE);
        assert!(FILTER_POINTS_WGSL.contains(&attribute));
    }

    #[test]
    fn test_header_declares_every_constant() {
        let header = constants_header();
        for name in [
            "WORKGROUP_SIZE",
            "LEVEL_SHIFT",
            "LEVEL_MASK",
            "CENTER_FALLOFF",
            "MIN_CENTER_WEIGHT",
            "TARGET_SPACING_DIVISOR",
            "JITTER_MULTIPLIER",
            "JITTER_MAX",
        ] {
            assert!(header.contains(&format!("const {}:", name)), "missing {}", name);
        }
        // Float literals must stay floats in WGSL
        assert!(header.contains("TARGET_SPACING_DIVISOR: f32 = 1000.0;"));
        assert!(header.contains("LEVEL_MASK: u32 = 4278190080u;"));
    }

    #[test]
    fn test_source_starts_with_header() {
        let source = filter_points_source();
        assert!(source.starts_with("// Generated from constants.rs"));
        assert!(source.ends_with(FILTER_POINTS_WGSL));
    }
}
