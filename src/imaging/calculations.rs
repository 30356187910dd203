//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate dimensions that fit inside a target area (resize before pad).
///
/// The result preserves the source aspect ratio; one dimension matches the
/// target, the other is smaller or equal. Never returns a zero dimension.
pub fn calculate_fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).min(tgt_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, tgt_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, tgt_h.max(1));
    (w, h)
}

/// Crop window, in source pixels, that covers a target area.
///
/// Returns `(x, y, width, height)`: the largest centered rectangle of the
/// source with the target's aspect ratio. Cropping first and resizing the
/// window keeps memory bounded by the source and the target, whatever the
/// source's aspect ratio.
pub fn calculate_cover_crop(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    let (w, h) = if src_aspect > tgt_aspect {
        // Source is wider: keep full height, trim the sides
        let w = ((src_h as f64 * tgt_aspect).round() as u32).clamp(1, src_w.max(1));
        (w, src_h)
    } else {
        // Source is taller: keep full width, trim top and bottom
        let h = ((src_w as f64 / tgt_aspect).round() as u32).clamp(1, src_h.max(1));
        (src_w, h)
    };
    let (x, y) = calculate_center_offset(source, (w, h));
    (x, y, w, h)
}

/// Top-left offset that centers `inner` within `outer`.
///
/// Works in both directions: placing a smaller image on a canvas, or
/// choosing the crop window inside a larger one.
pub fn calculate_center_offset(outer: (u32, u32), inner: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}

/// Edge length of the square box a splash logo is fitted into.
pub fn calculate_logo_box(canvas: (u32, u32), scale: f32) -> u32 {
    let short_edge = canvas.0.min(canvas.1);
    ((short_edge as f64 * scale as f64).round() as u32).clamp(1, short_edge.max(1))
}
