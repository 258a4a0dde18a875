//! Error types for sdl3-slang operations

use crate::target::{ShaderFormat, ShaderFormats};
use thiserror::Error;

/// Error type for sdl3-slang operations
///
/// Each compilation stage has its own variant so callers can tell a missing
/// source file from a missing entry point or a link failure without parsing
/// message strings.
#[derive(Error, Debug)]
pub enum Error {
    /// Creating the compiler's global session failed
    #[error("Failed to create global session: {0}")]
    GlobalSession(String),

    /// Creating a per-compile session failed
    #[error("Failed to create compile session for {format}")]
    Session {
        /// The target format the session was configured for
        format: ShaderFormat,
    },

    /// Loading the shader module failed (missing file or parse error)
    #[error("Failed to open shader `{path}`: {message}")]
    ModuleLoad {
        /// The module source path
        path: String,
        /// Diagnostic text from the compiler
        message: String,
    },

    /// The requested entry point does not exist in the module
    #[error("Failed to find entry point `{name}`: {message}")]
    EntryPointNotFound {
        /// The entry point name that was requested
        name: String,
        /// Diagnostic text from the compiler
        message: String,
    },

    /// Combining the module and entry point into a composite program failed
    #[error("Failed to compose program for `{entry_point}`: {message}")]
    Compose {
        /// The entry point being composed
        entry_point: String,
        /// Diagnostic text from the compiler
        message: String,
    },

    /// Linking the composite program failed
    #[error("Failed to link program: {message}")]
    Link {
        /// Diagnostic text from the compiler
        message: String,
    },

    /// Reading the linked program's parameter layout failed
    #[error("Reflection failed: {0}")]
    Reflection(String),

    /// Extracting target code from the linked program failed
    #[error("Failed to extract {format} code: {message}")]
    CodeExtraction {
        /// The target format code was requested for
        format: ShaderFormat,
        /// Diagnostic text from the compiler
        message: String,
    },

    /// The device supports none of the formats the compiler can emit
    #[error("No supported shader format: device reports {0:?}")]
    NoSupportedFormat(ShaderFormats),

    /// The device rejected the shader or pipeline create info
    #[error("Device rejected shader: {0}")]
    Device(String),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for sdl3-slang operations
pub type Result<T> = std::result::Result<T, Error>;
