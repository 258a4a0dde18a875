//! Compile Slang shaders into SDL3 GPU objects
//!
//! This crate bridges the Slang compiler and the SDL3 GPU API: it compiles
//! `.slang` source into whichever binary format the device accepts (SPIR-V,
//! DXBC, DXIL, or MSL), derives resource-binding counts from program
//! reflection, and creates the device shader or compute pipeline.
//!
//! # Example
//!
//! ```no_run
//! use sdl3_slang::{Compiler, Device, ShaderStage};
//!
//! # let raw_device: *mut sdl3_sys::gpu::SDL_GPUDevice = std::ptr::null_mut();
//! // The caller owns the SDL_GPUDevice; wrap it for capability queries.
//! let device = unsafe { Device::from_raw(raw_device) }.unwrap();
//!
//! let compiler = Compiler::new().unwrap();
//! let shader = compiler
//!     .shader("assets/shader.slang", "vertexMain")
//!     .compile_graphics(&device, ShaderStage::Vertex)
//!     .unwrap();
//! ```

mod compile;
mod device;
mod error;
pub mod reflect;
mod target;

pub use compile::{CompileBuilder, CompiledShader, Compiler, Define};
pub use device::{ComputePipeline, Device, Shader, ShaderStage};
pub use error::{Error, Result};
pub use reflect::ResourceCounts;
pub use target::{select_target, ShaderFormat, ShaderFormats, TargetProfile, TARGET_PRIORITY};

// Builder options pass through to the compiler's own level type.
pub use slang::OptimizationLevel;
