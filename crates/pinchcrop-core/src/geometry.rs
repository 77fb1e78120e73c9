//! Geometry primitives for the crop engine.
//!
//! These are the only home of the coverage and pan-bound algebra: total,
//! side-effect-free functions shared by the transform state, the gesture
//! composer and the crop resolver. Everything else in the crate derives its
//! clamping behavior from the three functions below.
//!
//! # Coordinate System
//!
//! - The crop window is a `side x side` square in screen units
//! - The image is centered in the window, then scaled and panned
//! - Translation is the offset of the image center from the window center

/// Clamp a value to the inclusive range `[lower, upper]`.
///
/// `lower <= upper` is a precondition the callers guarantee: the coverage
/// invariant keeps `min_scale <= max_scale`, and pan bounds are never
/// negative. The result is unspecified if the precondition is violated.
#[inline]
pub fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    value.max(lower).min(upper)
}

/// Compute the smallest scale at which an `img_w x img_h` image fully covers
/// a `side x side` crop window.
///
/// This is `max(side / img_w, side / img_h)`: the scale where the image's
/// short axis maps exactly edge-to-edge across the window. Any smaller scale
/// would reveal empty space inside the window.
///
/// Dimensions must be positive; session initialization rejects zero-sized
/// images and windows before this is ever called.
#[inline]
pub fn min_cover_scale(img_w: f64, img_h: f64, side: f64) -> f64 {
    (side / img_w).max(side / img_h)
}

/// Compute the maximum pan offset (per axis) that keeps the scaled image
/// covering the crop window.
///
/// `max(0, (dimension * scale - side) / 2)`: half the overhang of the scaled
/// image beyond the window. When the image's scaled extent exactly equals the
/// window side, the bound is zero and the axis is locked centered.
#[inline]
pub fn pan_bound(dimension: f64, scale: f64, side: f64) -> f64 {
    ((dimension * scale - side) / 2.0).max(0.0)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
