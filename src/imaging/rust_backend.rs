//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP) | `image::ImageReader` with format sniffing |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Pad / flatten / logo | `image::imageops::overlay` onto a solid canvas |
//! | Crop | `image::DynamicImage::crop_imm`, before resizing |
//! | Encode | `image::DynamicImage::write_to` (PNG or JPEG by extension) |
//!
//! A decoded source is cached for the lifetime of the backend, so rendering
//! twenty templates from one icon decodes it once even across rayon workers.

use super::backend::{BackendError, Dimensions, ImageBackend, OutputFormat};
use super::calculations::{
    calculate_center_offset, calculate_cover_crop, calculate_fit_dimensions,
    calculate_logo_box,
};
use super::params::{Color, Fit, LogoParams, RenderParams};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Extensions whose decoders are compiled in.
const SOURCE_EXTENSIONS: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("webp", ImageFormat::WebP),
];

/// Returns the source image extensions, in lookup priority order.
pub fn supported_input_extensions() -> Vec<&'static str> {
    SOURCE_EXTENSIONS
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
}

/// Backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Default)]
pub struct RustBackend {
    decoded: Mutex<HashMap<PathBuf, Arc<DynamicImage>>>,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path`, or return the copy decoded earlier.
    ///
    /// The lock is held while decoding so concurrent callers asking for the
    /// same source wait for one decode instead of racing.
    fn load(&self, path: &Path) -> Result<Arc<DynamicImage>, BackendError> {
        let mut cache = self
            .decoded
            .lock()
            .map_err(|_| BackendError::ProcessingFailed("decode cache poisoned".into()))?;
        if let Some(img) = cache.get(path) {
            return Ok(Arc::clone(img));
        }
        let img = Arc::new(load_image(path)?);
        cache.insert(path.to_path_buf(), Arc::clone(&img));
        Ok(img)
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba(color.0)
}

/// Drop the alpha channel when the canvas was flattened onto an opaque color.
fn finish(canvas: RgbaImage, background: Option<Color>) -> DynamicImage {
    let img = DynamicImage::ImageRgba8(canvas);
    match background {
        Some(color) if color.is_opaque() => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    }
}

/// Scale to fit, then center on a canvas of the exact target size.
fn contain(img: &DynamicImage, width: u32, height: u32, background: Option<Color>) -> DynamicImage {
    let (fit_w, fit_h) = calculate_fit_dimensions((img.width(), img.height()), (width, height));
    let resized = img.resize_exact(fit_w, fit_h, FilterType::Lanczos3).to_rgba8();

    let fill = background.map(to_rgba).unwrap_or(Rgba([0, 0, 0, 0]));
    let mut canvas = RgbaImage::from_pixel(width, height, fill);
    let (x, y) = calculate_center_offset((width, height), (fit_w, fit_h));
    imageops::overlay(&mut canvas, &resized, x as i64, y as i64);

    finish(canvas, background)
}

/// Center-crop the source to the target aspect, then scale to the exact size.
fn cover(img: &DynamicImage, width: u32, height: u32, background: Option<Color>) -> DynamicImage {
    let (x, y, crop_w, crop_h) = calculate_cover_crop((img.width(), img.height()), (width, height));
    let cropped = img
        .crop_imm(x, y, crop_w, crop_h)
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8();

    match background {
        Some(color) => {
            let mut canvas = RgbaImage::from_pixel(width, height, to_rgba(color));
            imageops::overlay(&mut canvas, &cropped, 0, 0);
            finish(canvas, background)
        }
        None => DynamicImage::ImageRgba8(cropped),
    }
}

/// Encode `img` to `path` in `format`.
fn save_image(img: &DynamicImage, path: &Path, format: OutputFormat) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = std::io::BufWriter::new(file);
    let result = match format {
        OutputFormat::Png => img.write_to(&mut writer, ImageFormat::Png),
        // JPEG has no alpha channel
        OutputFormat::Jpeg => {
            DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut writer, ImageFormat::Jpeg)
        }
    };
    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let format = OutputFormat::from_path(&params.output)?;
        let img = self.load(&params.source)?;

        let rendered = match params.fit {
            Fit::Contain => contain(&img, params.width, params.height, params.background),
            Fit::Cover => cover(&img, params.width, params.height, params.background),
        };

        save_image(&rendered, &params.output, format)
    }

    fn compose_logo(&self, params: &LogoParams) -> Result<(), BackendError> {
        let format = OutputFormat::from_path(&params.output)?;
        let logo = self.load(&params.logo)?;

        let side = calculate_logo_box((params.width, params.height), params.logo_scale);
        let (logo_w, logo_h) = calculate_fit_dimensions((logo.width(), logo.height()), (side, side));
        let resized = logo.resize_exact(logo_w, logo_h, FilterType::Lanczos3).to_rgba8();

        let mut canvas =
            RgbaImage::from_pixel(params.width, params.height, to_rgba(params.background));
        let (x, y) = calculate_center_offset((params.width, params.height), (logo_w, logo_h));
        imageops::overlay(&mut canvas, &resized, x as i64, y as i64);

        save_image(&finish(canvas, Some(params.background)), &params.output, format)
    }
}
