//! SDL3 GPU device shim
//!
//! Thin safe wrappers over the `sdl3-sys` GPU entry points this crate needs:
//! reading a device's supported format mask and turning a [`CompiledShader`]
//! into a device shader or compute pipeline. All unsafe FFI is confined to
//! this module. Device creation and window handling stay with the caller.

use crate::compile::CompiledShader;
use crate::target::{ShaderFormat, ShaderFormats};
use crate::{Error, Result};
use sdl3_sys::error::SDL_GetError;
use sdl3_sys::gpu::{
    SDL_CreateGPUComputePipeline, SDL_CreateGPUShader, SDL_GPUComputePipeline,
    SDL_GPUComputePipelineCreateInfo, SDL_GPUDevice, SDL_GPUShader, SDL_GPUShaderCreateInfo,
    SDL_GetGPUShaderFormats, SDL_ReleaseGPUComputePipeline, SDL_ReleaseGPUShader,
    SDL_GPU_SHADERFORMAT_DXBC, SDL_GPU_SHADERFORMAT_DXIL, SDL_GPU_SHADERFORMAT_INVALID,
    SDL_GPU_SHADERFORMAT_METALLIB, SDL_GPU_SHADERFORMAT_MSL, SDL_GPU_SHADERFORMAT_PRIVATE,
    SDL_GPU_SHADERFORMAT_SPIRV, SDL_GPU_SHADERSTAGE_FRAGMENT, SDL_GPU_SHADERSTAGE_VERTEX,
};
use std::ffi::{CStr, CString};
use std::ptr::NonNull;

/// Graphics shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl ShaderStage {
    fn to_sdl(self) -> sdl3_sys::gpu::SDL_GPUShaderStage {
        match self {
            ShaderStage::Vertex => SDL_GPU_SHADERSTAGE_VERTEX,
            ShaderStage::Fragment => SDL_GPU_SHADERSTAGE_FRAGMENT,
        }
    }
}

impl ShaderFormat {
    fn to_sdl(self) -> sdl3_sys::gpu::SDL_GPUShaderFormat {
        match self {
            ShaderFormat::Spirv => SDL_GPU_SHADERFORMAT_SPIRV,
            ShaderFormat::Dxbc => SDL_GPU_SHADERFORMAT_DXBC,
            ShaderFormat::Dxil => SDL_GPU_SHADERFORMAT_DXIL,
            ShaderFormat::Msl => SDL_GPU_SHADERFORMAT_MSL,
        }
    }
}

/// Non-owning handle to an `SDL_GPUDevice`
///
/// The caller creates and destroys the device through SDL; this wrapper only
/// borrows it for capability queries and object creation.
#[derive(Debug, Clone, Copy)]
pub struct Device {
    ptr: NonNull<SDL_GPUDevice>,
}

impl Device {
    /// Wraps a raw device pointer. Returns `None` for null.
    ///
    /// # Safety
    /// The pointer must be a valid `SDL_GPUDevice` and must outlive this
    /// wrapper and every object created through it.
    pub unsafe fn from_raw(ptr: *mut SDL_GPUDevice) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Device { ptr })
    }

    /// Returns the shader formats this device accepts.
    pub fn shader_formats(&self) -> ShaderFormats {
        let raw = unsafe { SDL_GetGPUShaderFormats(self.ptr.as_ptr()) };
        let mut formats = ShaderFormats::empty();
        if raw & SDL_GPU_SHADERFORMAT_PRIVATE != SDL_GPU_SHADERFORMAT_INVALID {
            formats |= ShaderFormats::PRIVATE;
        }
        if raw & SDL_GPU_SHADERFORMAT_SPIRV != SDL_GPU_SHADERFORMAT_INVALID {
            formats |= ShaderFormats::SPIRV;
        }
        if raw & SDL_GPU_SHADERFORMAT_DXBC != SDL_GPU_SHADERFORMAT_INVALID {
            formats |= ShaderFormats::DXBC;
        }
        if raw & SDL_GPU_SHADERFORMAT_DXIL != SDL_GPU_SHADERFORMAT_INVALID {
            formats |= ShaderFormats::DXIL;
        }
        if raw & SDL_GPU_SHADERFORMAT_MSL != SDL_GPU_SHADERFORMAT_INVALID {
            formats |= ShaderFormats::MSL;
        }
        if raw & SDL_GPU_SHADERFORMAT_METALLIB != SDL_GPU_SHADERFORMAT_INVALID {
            formats |= ShaderFormats::METALLIB;
        }
        formats
    }

    /// Returns the raw device pointer.
    pub fn as_ptr(&self) -> *mut SDL_GPUDevice {
        self.ptr.as_ptr()
    }
}

/// RAII wrapper for `SDL_GPUShader`
///
/// Released through the owning device on drop.
pub struct Shader {
    device: NonNull<SDL_GPUDevice>,
    ptr: NonNull<SDL_GPUShader>,
}

impl Shader {
    /// Returns the raw shader pointer for use in pipeline create info.
    pub fn as_ptr(&self) -> *mut SDL_GPUShader {
        self.ptr.as_ptr()
    }

    /// Releases ownership; the caller must release the shader through SDL.
    pub fn into_raw(self) -> *mut SDL_GPUShader {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            SDL_ReleaseGPUShader(self.device.as_ptr(), self.ptr.as_ptr());
        }
    }
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader").field("ptr", &self.ptr).finish()
    }
}

/// RAII wrapper for `SDL_GPUComputePipeline`
///
/// Released through the owning device on drop.
pub struct ComputePipeline {
    device: NonNull<SDL_GPUDevice>,
    ptr: NonNull<SDL_GPUComputePipeline>,
}

impl ComputePipeline {
    /// Returns the raw pipeline pointer for use in compute passes.
    pub fn as_ptr(&self) -> *mut SDL_GPUComputePipeline {
        self.ptr.as_ptr()
    }

    /// Releases ownership; the caller must release the pipeline through SDL.
    pub fn into_raw(self) -> *mut SDL_GPUComputePipeline {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }
}

impl Drop for ComputePipeline {
    fn drop(&mut self) {
        unsafe {
            SDL_ReleaseGPUComputePipeline(self.device.as_ptr(), self.ptr.as_ptr());
        }
    }
}

impl std::fmt::Debug for ComputePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputePipeline")
            .field("ptr", &self.ptr)
            .finish()
    }
}

fn last_sdl_error() -> String {
    unsafe {
        let message = SDL_GetError();
        if message.is_null() {
            String::new()
        } else {
            CStr::from_ptr(message).to_string_lossy().into_owned()
        }
    }
}

/// Creates a device shader from compiled code and merged binding counts.
pub(crate) fn create_shader(
    device: &Device,
    stage: ShaderStage,
    compiled: &CompiledShader,
) -> Result<Shader> {
    let entry_point =
        CString::new(compiled.entry_point.as_str()).expect("Entry point contains null byte");
    let resources = &compiled.resources;

    let mut info: SDL_GPUShaderCreateInfo = unsafe { std::mem::zeroed() };
    info.code_size = compiled.code.len();
    info.code = compiled.code.as_ptr();
    info.entrypoint = entry_point.as_ptr();
    info.format = compiled.format.to_sdl();
    info.stage = stage.to_sdl();
    info.num_samplers = resources.samplers;
    info.num_storage_textures = resources.storage_textures();
    info.num_storage_buffers = resources.storage_buffers();
    info.num_uniform_buffers = resources.uniform_buffers;

    let ptr = unsafe { SDL_CreateGPUShader(device.as_ptr(), &info) };
    match NonNull::new(ptr) {
        Some(ptr) => Ok(Shader {
            device: device.ptr,
            ptr,
        }),
        None => Err(Error::Device(last_sdl_error())),
    }
}

/// Creates a device compute pipeline from compiled code, split binding
/// counts, and reflected thread-group dimensions.
pub(crate) fn create_compute_pipeline(
    device: &Device,
    compiled: &CompiledShader,
) -> Result<ComputePipeline> {
    let entry_point =
        CString::new(compiled.entry_point.as_str()).expect("Entry point contains null byte");
    let resources = &compiled.resources;

    let mut info: SDL_GPUComputePipelineCreateInfo = unsafe { std::mem::zeroed() };
    info.code_size = compiled.code.len();
    info.code = compiled.code.as_ptr();
    info.entrypoint = entry_point.as_ptr();
    info.format = compiled.format.to_sdl();
    info.num_samplers = resources.samplers;
    info.num_readonly_storage_textures = resources.readonly_storage_textures;
    info.num_readonly_storage_buffers = resources.readonly_storage_buffers;
    info.num_readwrite_storage_textures = resources.readwrite_storage_textures;
    info.num_readwrite_storage_buffers = resources.readwrite_storage_buffers;
    info.num_uniform_buffers = resources.uniform_buffers;
    info.threadcount_x = compiled.thread_group_size[0];
    info.threadcount_y = compiled.thread_group_size[1];
    info.threadcount_z = compiled.thread_group_size[2];

    let ptr = unsafe { SDL_CreateGPUComputePipeline(device.as_ptr(), &info) };
    match NonNull::new(ptr) {
        Some(ptr) => Ok(ComputePipeline {
            device: device.ptr,
            ptr,
        }),
        None => Err(Error::Device(last_sdl_error())),
    }
}
