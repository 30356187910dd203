//! Image processing, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Contain** (icons) | Lanczos3 resize + centered pad |
//! | **Cover** (splashes) | Center crop to target aspect + Lanczos3 resize |
//! | **Logo splash** | Lanczos3 resize + overlay on solid canvas |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Planning functions that map templates to parameters

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, OutputFormat};
pub use operations::{get_dimensions, plan_logo, plan_render};
pub use params::{Color, Fit, LogoParams, RenderParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
