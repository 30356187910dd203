//! High-level image operations.
//!
//! These functions turn a catalog template plus a source into backend
//! parameters, then call the backend. Planning is split from execution so
//! parameter generation can be tested without images.

use super::backend::{BackendError, ImageBackend};
use super::params::{Color, LogoParams, RenderParams};
use crate::catalog::IosTemplate;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Plan rendering `template` from `source` into `output`.
pub fn plan_render(
    template: &IosTemplate,
    source: &Path,
    output: &Path,
    background: Option<Color>,
) -> RenderParams {
    RenderParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width: template.width,
        height: template.height,
        fit: template.kind.fit(),
        background,
    }
}

/// Plan rendering `template` as a logo centered on `background`.
pub fn plan_logo(
    template: &IosTemplate,
    logo: &Path,
    output: &Path,
    logo_scale: f32,
    background: Color,
) -> LogoParams {
    LogoParams {
        logo: logo.to_path_buf(),
        output: output.to_path_buf(),
        width: template.width,
        height: template.height,
        logo_scale,
        background,
    }
}
