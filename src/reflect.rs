//! Reflection translation: Slang program layout to SDL GPU binding counts
//!
//! The SDL3 GPU API requires explicit per-category resource counts when
//! creating a shader or compute pipeline. This module walks the linked
//! program's parameter layout and buckets every top-level parameter into one
//! of those categories.

use slang::reflection;

/// Resource binding counts derived from a compiled program's reflection
///
/// Classification always records the read-only / read-write split. Graphics
/// shader create info has no split, so that path consumes the merged
/// [`storage_buffers`](Self::storage_buffers) and
/// [`storage_textures`](Self::storage_textures) sums; compute pipelines
/// consume the split fields directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    /// Number of sampler-state parameters
    pub samplers: u32,
    /// Number of read-only storage buffers
    pub readonly_storage_buffers: u32,
    /// Number of read-write storage buffers
    pub readwrite_storage_buffers: u32,
    /// Number of read-only storage textures
    pub readonly_storage_textures: u32,
    /// Number of read-write storage textures
    pub readwrite_storage_textures: u32,
    /// Number of uniform buffers
    pub uniform_buffers: u32,
}

impl ResourceCounts {
    /// Total storage buffers regardless of access.
    pub fn storage_buffers(&self) -> u32 {
        self.readonly_storage_buffers + self.readwrite_storage_buffers
    }

    /// Total storage textures regardless of access.
    pub fn storage_textures(&self) -> u32 {
        self.readonly_storage_textures + self.readwrite_storage_textures
    }

    /// Total classified parameters.
    ///
    /// Never exceeds the program's parameter count; equals it only when
    /// every parameter fell into a known category.
    pub fn total(&self) -> u32 {
        self.samplers
            + self.readonly_storage_buffers
            + self.readwrite_storage_buffers
            + self.readonly_storage_textures
            + self.readwrite_storage_textures
            + self.uniform_buffers
    }

    /// Classifies every top-level parameter of a linked program layout.
    ///
    /// Each parameter is bucketed by its type-layout kind, falling back to
    /// its binding category for plain uniforms. A parameter matching no
    /// known category is logged as a warning and left uncounted.
    pub fn from_layout(layout: &reflection::Shader) -> Self {
        let mut counts = ResourceCounts::default();

        for i in 0..layout.parameter_count() {
            let Some(parameter) = layout.parameter_by_index(i) else {
                continue;
            };
            let type_layout = parameter.type_layout();
            let kind = type_layout.kind();

            match kind {
                slang::TypeKind::SamplerState => counts.samplers += 1,
                slang::TypeKind::ShaderStorageBuffer => {
                    if is_read_write(type_layout) {
                        counts.readwrite_storage_buffers += 1;
                    } else {
                        counts.readonly_storage_buffers += 1;
                    }
                }
                slang::TypeKind::TextureBuffer => {
                    if is_read_write(type_layout) {
                        counts.readwrite_storage_textures += 1;
                    } else {
                        counts.readonly_storage_textures += 1;
                    }
                }
                _ if matches!(
                    type_layout.parameter_category(),
                    slang::ParameterCategory::Uniform
                ) =>
                {
                    counts.uniform_buffers += 1;
                }
                _ => {
                    log::warn!("Unclassified shader parameter {i} of kind {kind:?}");
                }
            }
        }

        counts
    }
}

fn is_read_write(type_layout: &reflection::TypeLayout) -> bool {
    matches!(
        type_layout.resource_access(),
        Some(slang::ResourceAccess::ReadWrite)
    )
}

/// Extracts the compute thread-group dimensions from entry point 0.
///
/// Graphics entry points have no thread-group size; they report `[0, 0, 0]`
/// and the value goes unused on that path.
pub(crate) fn thread_group_size(layout: &reflection::Shader) -> [u32; 3] {
    let Some(entry_point) = layout.entry_point_by_index(0) else {
        return [0, 0, 0];
    };
    match entry_point.stage() {
        slang::Stage::Compute => {
            let [x, y, z] = entry_point.compute_thread_group_size();
            [x as u32, y as u32, z as u32]
        }
        _ => [0, 0, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_zero() {
        let counts = ResourceCounts::default();
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.storage_buffers(), 0);
        assert_eq!(counts.storage_textures(), 0);
    }

    #[test]
    fn test_storage_sums_merge_access() {
        let counts = ResourceCounts {
            readonly_storage_buffers: 2,
            readwrite_storage_buffers: 1,
            readonly_storage_textures: 3,
            readwrite_storage_textures: 4,
            ..Default::default()
        };
        assert_eq!(counts.storage_buffers(), 3);
        assert_eq!(counts.storage_textures(), 7);
    }

    #[test]
    fn test_total_counts_every_bucket() {
        let counts = ResourceCounts {
            samplers: 1,
            readonly_storage_buffers: 2,
            readwrite_storage_buffers: 3,
            readonly_storage_textures: 4,
            readwrite_storage_textures: 5,
            uniform_buffers: 6,
        };
        assert_eq!(counts.total(), 21);
    }
}
