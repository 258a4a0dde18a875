//! Target selection: device format mask to (binary format, Slang profile)

use bitflags::bitflags;
use std::fmt;

/// A shader binary format the SDL3 GPU API can consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderFormat {
    /// SPIR-V (Vulkan)
    Spirv,
    /// DXBC shader model 5 bytecode (Direct3D 11/12)
    Dxbc,
    /// DXIL (Direct3D 12)
    Dxil,
    /// Metal Shading Language source (Metal)
    Msl,
}

impl ShaderFormat {
    /// Returns the Slang profile name used when emitting this format.
    pub const fn profile(&self) -> &'static str {
        match self {
            ShaderFormat::Spirv => "glsl_450",
            ShaderFormat::Dxbc => "sm_5_0",
            ShaderFormat::Dxil => "sm_5_0",
            ShaderFormat::Msl => "metal",
        }
    }

    /// Returns the corresponding Slang compile target.
    pub(crate) fn compile_target(&self) -> slang::CompileTarget {
        match self {
            ShaderFormat::Spirv => slang::CompileTarget::Spirv,
            ShaderFormat::Dxbc => slang::CompileTarget::Dxbc,
            ShaderFormat::Dxil => slang::CompileTarget::Dxil,
            ShaderFormat::Msl => slang::CompileTarget::Metal,
        }
    }

    /// Returns this format as a single-bit capability mask.
    pub const fn mask(&self) -> ShaderFormats {
        match self {
            ShaderFormat::Spirv => ShaderFormats::SPIRV,
            ShaderFormat::Dxbc => ShaderFormats::DXBC,
            ShaderFormat::Dxil => ShaderFormats::DXIL,
            ShaderFormat::Msl => ShaderFormats::MSL,
        }
    }
}

impl fmt::Display for ShaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderFormat::Spirv => "SPIR-V",
            ShaderFormat::Dxbc => "DXBC",
            ShaderFormat::Dxil => "DXIL",
            ShaderFormat::Msl => "MSL",
        })
    }
}

bitflags! {
    /// Shader formats a GPU device accepts
    ///
    /// Bit values match the `SDL_GPU_SHADERFORMAT_*` constants. `PRIVATE`
    /// and `METALLIB` exist in the device mask but are never selected since
    /// the compiler cannot emit them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderFormats: u32 {
        /// NDA'd platform-specific format
        const PRIVATE = 1 << 0;
        /// SPIR-V
        const SPIRV = 1 << 1;
        /// DXBC shader model 5 bytecode
        const DXBC = 1 << 2;
        /// DXIL
        const DXIL = 1 << 3;
        /// Metal Shading Language source
        const MSL = 1 << 4;
        /// Precompiled Metal library
        const METALLIB = 1 << 5;
    }
}

/// A (binary format, Slang profile) pair the compiler emits code for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetProfile {
    /// The binary format
    pub format: ShaderFormat,
    /// The Slang profile identifier (e.g. "glsl_450")
    pub profile: &'static str,
}

impl TargetProfile {
    /// Creates the target profile for a format, with its default profile.
    pub const fn new(format: ShaderFormat) -> Self {
        TargetProfile {
            format,
            profile: format.profile(),
        }
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.format, self.profile)
    }
}

/// Format preference when a device supports more than one.
///
/// Exactly one target is selected per compilation; lower-priority formats a
/// device also supports are never tried.
pub const TARGET_PRIORITY: [ShaderFormat; 4] = [
    ShaderFormat::Spirv,
    ShaderFormat::Dxbc,
    ShaderFormat::Dxil,
    ShaderFormat::Msl,
];

/// Picks the single compile target for a device capability mask.
///
/// Returns the highest-priority format present in `formats` per
/// [`TARGET_PRIORITY`], or `None` if the device supports no format the
/// compiler can emit.
///
/// # Example
/// ```
/// use sdl3_slang::{select_target, ShaderFormat, ShaderFormats};
///
/// let target = select_target(ShaderFormats::DXIL | ShaderFormats::MSL).unwrap();
/// assert_eq!(target.format, ShaderFormat::Dxil);
/// ```
pub fn select_target(formats: ShaderFormats) -> Option<TargetProfile> {
    TARGET_PRIORITY
        .iter()
        .find(|format| formats.contains(format.mask()))
        .map(|format| TargetProfile::new(*format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_format_masks() {
        for format in TARGET_PRIORITY {
            let target = select_target(format.mask()).unwrap();
            assert_eq!(target.format, format);
            assert_eq!(target.profile, format.profile());
        }
    }

    #[test]
    fn test_priority_order() {
        let all = ShaderFormats::SPIRV | ShaderFormats::DXBC | ShaderFormats::DXIL | ShaderFormats::MSL;
        assert_eq!(select_target(all).unwrap().format, ShaderFormat::Spirv);

        let no_spirv = ShaderFormats::DXBC | ShaderFormats::DXIL | ShaderFormats::MSL;
        assert_eq!(select_target(no_spirv).unwrap().format, ShaderFormat::Dxbc);

        let dxil_msl = ShaderFormats::DXIL | ShaderFormats::MSL;
        assert_eq!(select_target(dxil_msl).unwrap().format, ShaderFormat::Dxil);

        assert_eq!(
            select_target(ShaderFormats::MSL).unwrap().format,
            ShaderFormat::Msl
        );
    }

    #[test]
    fn test_priority_ignores_unselectable_bits() {
        let mask = ShaderFormats::PRIVATE | ShaderFormats::METALLIB | ShaderFormats::MSL;
        assert_eq!(select_target(mask).unwrap().format, ShaderFormat::Msl);
    }

    #[test]
    fn test_no_selectable_format() {
        assert_eq!(select_target(ShaderFormats::empty()), None);
        assert_eq!(select_target(ShaderFormats::PRIVATE), None);
        assert_eq!(
            select_target(ShaderFormats::PRIVATE | ShaderFormats::METALLIB),
            None
        );
    }

    #[test]
    fn test_profiles() {
        assert_eq!(ShaderFormat::Spirv.profile(), "glsl_450");
        assert_eq!(ShaderFormat::Dxbc.profile(), "sm_5_0");
        assert_eq!(ShaderFormat::Dxil.profile(), "sm_5_0");
        assert_eq!(ShaderFormat::Msl.profile(), "metal");
    }
}
