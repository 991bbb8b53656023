//! Crate-level error types.

use std::fmt;

#[cfg(feature = "wgpu")]
use crate::gpu::render_context::RenderContextError;
use crate::surface::host::ContextId;

/// Errors produced by the orbitview crate.
#[derive(Debug)]
pub enum ViewError {
    /// The host failed to destroy a graphics context. Fatal: the context's
    /// resources may have leaked and its id can never be reused.
    ContextDestruction {
        /// Context the host could not tear down.
        context: ContextId,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// GPU context initialization failure.
    #[cfg(feature = "wgpu")]
    Gpu(RenderContextError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextDestruction { context } => {
                write!(f, "could not destroy graphics context {context}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            #[cfg(feature = "wgpu")]
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "wgpu")]
            Self::Gpu(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "wgpu")]
impl From<RenderContextError> for ViewError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}
