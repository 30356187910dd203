//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, render (resize + fit) and compose_logo.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Everything is statically linked into the binary.

use super::params::{LogoParams, RenderParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Encodings the backend can write, chosen by output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, BackendError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "" => Err(BackendError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
            other => Err(BackendError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Trait for image processing backends.
///
/// The rest of the codebase only talks to this trait, so generation logic
/// can be tested against [`tests::MockBackend`] without touching pixels.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize a source to exact dimensions and write it.
    fn render(&self, params: &RenderParams) -> Result<(), BackendError>;

    /// Center a logo on a solid canvas and write it.
    fn compose_logo(&self, params: &LogoParams) -> Result<(), BackendError>;
}
