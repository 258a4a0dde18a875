//! Shader compilation pipeline
//!
//! A [`Compiler`] owns the Slang global session. Each compile request builds
//! a short-lived per-target session, loads the module, resolves the entry
//! point, links, and extracts target code; every intermediate object is
//! released when the request ends, on success and failure paths alike.

use crate::device::{ComputePipeline, Device, Shader, ShaderStage};
use crate::reflect::{self, ResourceCounts};
use crate::target::{ShaderFormat, TargetProfile, select_target};
use crate::{Error, Result};
use slang::Downcast;
use std::ffi::{CString, c_char};

/// A preprocessor macro definition, forwarded verbatim to the compiler
#[derive(Debug, Clone)]
pub struct Define {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl Define {
    /// Creates a new preprocessor define
    ///
    /// # Example
    /// ```
    /// use sdl3_slang::Define;
    /// let define = Define::new("DEBUG", "1");
    /// ```
    pub fn new(name: &str, value: &str) -> Self {
        Define {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates a define with an empty value
    pub fn flag(name: &str) -> Self {
        Self::new(name, "")
    }
}

/// Result of a successful shader compilation
///
/// Holds everything the device needs to create a shader or compute pipeline,
/// independent of any device: the code blob, the format it was emitted for,
/// and the binding counts derived from reflection.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    /// The compiled code blob
    pub code: Vec<u8>,
    /// The format the code was emitted for
    pub format: ShaderFormat,
    /// The entry point name the code was compiled against
    pub entry_point: String,
    /// Resource binding counts from reflection
    pub resources: ResourceCounts,
    /// Compute thread-group dimensions from reflection; zero for graphics
    /// entry points
    pub thread_group_size: [u32; 3],
}

/// Owner of the Slang global session
///
/// Replaces a process-global init/quit lifecycle with a scoped value:
/// construct one with [`Compiler::new`], drop it when done. Independent
/// `Compiler` values are fully independent; for parallel compilation use one
/// per thread.
pub struct Compiler {
    global: slang::GlobalSession,
}

impl Compiler {
    /// Creates a compiler with its own global session.
    pub fn new() -> Result<Self> {
        let global = slang::GlobalSession::new()
            .ok_or_else(|| Error::GlobalSession("failed to create global session".to_string()))?;
        Ok(Compiler { global })
    }

    /// Starts a compile request for a shader source file and entry point.
    pub fn shader<'a>(&'a self, source: &'a str, entry_point: &'a str) -> CompileBuilder<'a> {
        CompileBuilder::new(self, source, entry_point)
    }

    /// Compiles a graphics shader and creates the device shader object.
    ///
    /// Flat-signature convenience over [`CompileBuilder`].
    pub fn compile_graphics_shader(
        &self,
        device: &Device,
        stage: ShaderStage,
        source: &str,
        entry_point: &str,
        search_paths: &[&str],
        defines: &[Define],
    ) -> Result<Shader> {
        self.shader(source, entry_point)
            .search_paths(search_paths.iter().copied())
            .with_defines(defines.iter().cloned())
            .compile_graphics(device, stage)
    }

    /// Compiles a compute shader and creates the device compute pipeline.
    ///
    /// Flat-signature convenience over [`CompileBuilder`].
    pub fn compile_compute_shader(
        &self,
        device: &Device,
        source: &str,
        entry_point: &str,
        search_paths: &[&str],
        defines: &[Define],
    ) -> Result<ComputePipeline> {
        self.shader(source, entry_point)
            .search_paths(search_paths.iter().copied())
            .with_defines(defines.iter().cloned())
            .compile_compute(device)
    }
}

/// Builder for shader compilation with fluent API
///
/// # Example
/// ```no_run
/// use sdl3_slang::{Compiler, ShaderFormat, TargetProfile};
///
/// let compiler = Compiler::new().unwrap();
/// let compiled = compiler
///     .shader("assets/shader.slang", "vertexMain")
///     .search_path("assets")
///     .define("USE_FOG", "1")
///     .compile(&TargetProfile::new(ShaderFormat::Spirv))
///     .unwrap();
///
/// assert!(!compiled.code.is_empty());
/// ```
pub struct CompileBuilder<'a> {
    compiler: &'a Compiler,
    source: &'a str,
    entry_point: &'a str,
    search_paths: Vec<CString>,
    defines: Vec<Define>,
    optimization: slang::OptimizationLevel,
    matrix_layout_row: bool,
}

impl<'a> CompileBuilder<'a> {
    /// Creates a new compile builder with the required parameters.
    ///
    /// # Arguments
    /// * `compiler` - The compiler session owner
    /// * `source` - Path to the `.slang` source file
    /// * `entry_point` - The name of the entry point function
    pub fn new(compiler: &'a Compiler, source: &'a str, entry_point: &'a str) -> Self {
        CompileBuilder {
            compiler,
            source,
            entry_point,
            search_paths: Vec::new(),
            defines: Vec::new(),
            optimization: slang::OptimizationLevel::Default,
            matrix_layout_row: false,
        }
    }

    /// Adds a module search path.
    pub fn search_path(mut self, path: &str) -> Self {
        self.search_paths
            .push(CString::new(path).expect("Search path contains null byte"));
        self
    }

    /// Adds multiple module search paths from an iterator.
    pub fn search_paths<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for path in paths {
            self = self.search_path(path);
        }
        self
    }

    /// Adds a preprocessor define.
    pub fn define(mut self, name: &str, value: &str) -> Self {
        self.defines.push(Define::new(name, value));
        self
    }

    /// Adds a preprocessor define flag (empty value).
    pub fn define_flag(mut self, name: &str) -> Self {
        self.defines.push(Define::flag(name));
        self
    }

    /// Adds pre-built defines from an iterator.
    pub fn with_defines<I>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = Define>,
    {
        self.defines.extend(defines);
        self
    }

    /// Sets the optimization level (default: [`slang::OptimizationLevel::Default`]).
    pub fn optimization(mut self, level: slang::OptimizationLevel) -> Self {
        self.optimization = level;
        self
    }

    /// Packs matrices in row-major order.
    pub fn row_major_matrices(mut self) -> Self {
        self.matrix_layout_row = true;
        self
    }

    /// Compiles against an explicit target, without touching a device.
    ///
    /// Runs the full pipeline: session creation, module load, entry point
    /// resolution, composition, linking, reflection, and code extraction.
    /// Every stage failure is terminal for the request and maps to its own
    /// [`Error`] variant.
    pub fn compile(&self, target: &TargetProfile) -> Result<CompiledShader> {
        let target_desc = slang::TargetDesc::default()
            .format(target.format.compile_target())
            .profile(self.compiler.global.find_profile(target.profile));
        let targets = [target_desc];

        let mut options = slang::CompilerOptions::default()
            .optimization(self.optimization)
            .matrix_layout_row(self.matrix_layout_row);
        for define in &self.defines {
            options = options.macro_define(&define.name, &define.value);
        }

        let search_paths: Vec<*const c_char> =
            self.search_paths.iter().map(|path| path.as_ptr()).collect();

        let session_desc = slang::SessionDesc::default()
            .targets(&targets)
            .search_paths(&search_paths)
            .options(&options);

        let session = self
            .compiler
            .global
            .create_session(&session_desc)
            .ok_or(Error::Session {
                format: target.format,
            })?;

        let module = session.load_module(self.source).map_err(|e| {
            let message = format!("{e:?}");
            log::warn!("Compiler diagnostics for `{}`: {message}", self.source);
            Error::ModuleLoad {
                path: self.source.to_string(),
                message,
            }
        })?;

        let entry_point = module
            .find_entry_point_by_name(self.entry_point)
            .ok_or_else(|| Error::EntryPointNotFound {
                name: self.entry_point.to_string(),
                message: "entry point not found in module".to_string(),
            })?;

        let program = session
            .create_composite_component_type(&[
                module.downcast().clone(),
                entry_point.downcast().clone(),
            ])
            .map_err(|e| Error::Compose {
                entry_point: self.entry_point.to_string(),
                message: format!("{e:?}"),
            })?;

        let linked = program.link().map_err(|e| {
            let message = format!("{e:?}");
            log::warn!("Link diagnostics for `{}`: {message}", self.source);
            Error::Link { message }
        })?;

        let layout = linked
            .layout(0)
            .map_err(|e| Error::Reflection(format!("{e:?}")))?;

        if log::log_enabled!(log::Level::Debug) {
            for i in 0..layout.entry_point_count() {
                if let Some(ep) = layout.entry_point_by_index(i) {
                    log::debug!("Entry point {i}: {}", ep.name());
                }
            }
        }

        let resources = ResourceCounts::from_layout(layout);
        let thread_group_size = reflect::thread_group_size(layout);

        // Entry point 0 against the single configured target.
        let code = linked.entry_point_code(0, 0).map_err(|e| {
            let message = format!("{e:?}");
            log::warn!("Code generation diagnostics for `{}`: {message}", self.source);
            Error::CodeExtraction {
                format: target.format,
                message,
            }
        })?;

        Ok(CompiledShader {
            code: code.as_slice().to_vec(),
            format: target.format,
            entry_point: self.entry_point.to_string(),
            resources,
            thread_group_size,
        })
    }

    /// Compiles a graphics shader and creates the device shader object.
    ///
    /// Selects the target from the device capability mask, compiles, and
    /// passes code plus merged binding counts to the device.
    pub fn compile_graphics(&self, device: &Device, stage: ShaderStage) -> Result<Shader> {
        let formats = device.shader_formats();
        let target = select_target(formats).ok_or(Error::NoSupportedFormat(formats))?;
        let compiled = self.compile(&target)?;
        crate::device::create_shader(device, stage, &compiled)
    }

    /// Compiles a compute shader and creates the device compute pipeline.
    ///
    /// Selects the target from the device capability mask, compiles, and
    /// passes code, split binding counts, and the reflected thread-group
    /// dimensions to the device.
    pub fn compile_compute(&self, device: &Device) -> Result<ComputePipeline> {
        let formats = device.shader_formats();
        let target = select_target(formats).ok_or(Error::NoSupportedFormat(formats))?;
        let compiled = self.compile(&target)?;
        crate::device::create_compute_pipeline(device, &compiled)
    }
}
