//! Session data model: source image, crop window and the mutable transform.
//!
//! Exactly one [`TransformState`] exists per crop session. It owns the
//! current scale and translation together with their gesture-start anchors,
//! and it is the single writer surface for the gesture composer. The derived
//! scale bounds are recomputed whenever the source image or crop window
//! changes, so the three invariants hold after every committed update:
//!
//! 1. Coverage: the scaled image always fully covers the crop window
//! 2. Zoom bound: `min_scale <= scale <= min_scale * MAX_ZOOM_MULTIPLIER`
//! 3. Pan bound: translation never reveals space outside the image

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{clamp, min_cover_scale, pan_bound};
use crate::produce::AssetUri;
use crate::{MAX_WINDOW_SIDE, MAX_ZOOM_MULTIPLIER};

/// Errors that reject a crop session before any gesture is processed.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Source image has a zero-sized axis; the cover scale is undefined.
    #[error("Invalid image dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidImageDimensions { width: u32, height: u32 },

    /// Crop window side is not positive.
    #[error("Invalid crop window: side ({side}) must be positive")]
    InvalidCropWindow { side: f64 },
}

/// The source image under edit, immutable for the session.
///
/// Dimensions are the image's natural pixel extent as reported by the host's
/// picker; the URI is an opaque handle the engine never interprets, only
/// returns (possibly unchanged, on fallback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Opaque asset handle owned by the host.
    pub uri: AssetUri,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, uri: impl Into<AssetUri>) -> Self {
        Self {
            width,
            height,
            uri: uri.into(),
        }
    }
}

/// The square viewport where the image is displayed and gestures are
/// interpreted, immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropWindow {
    /// Side length in logical screen units.
    pub side: f64,
}

impl CropWindow {
    pub fn new(side: f64) -> Self {
        Self { side }
    }

    /// Derive the crop window from the available screen width, capped at
    /// [`MAX_WINDOW_SIDE`] logical units.
    pub fn fit_screen(screen_width: f64) -> Self {
        Self {
            side: screen_width.min(MAX_WINDOW_SIDE),
        }
    }
}

/// Offset of the image center from the crop-window center, in screen units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };
}

/// The mutable view transform of an active crop session.
///
/// Fields are private: all mutation flows through the gesture composer in
/// [`crate::transform::gesture`] and through [`TransformState::reset`], which
/// is what keeps the invariants enforceable in one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformState {
    img_w: f64,
    img_h: f64,
    side: f64,
    scale: f64,
    translation: Offset,
    // Gesture-start snapshots; folded back in on commit.
    pub(crate) scale_anchor: f64,
    pub(crate) translation_anchor: Offset,
    min_scale: f64,
    max_scale: f64,
}

impl TransformState {
    /// Create the transform for a new session, at minimum zoom, centered.
    ///
    /// Fails fast with [`SessionError`] on a zero-sized image or a
    /// non-positive window side; no gesture is ever processed against an
    /// invalid geometry.
    pub fn new(image: &SourceImage, window: CropWindow) -> Result<Self, SessionError> {
        if image.width == 0 || image.height == 0 {
            return Err(SessionError::InvalidImageDimensions {
                width: image.width,
                height: image.height,
            });
        }
        if !(window.side > 0.0) {
            return Err(SessionError::InvalidCropWindow { side: window.side });
        }

        let img_w = f64::from(image.width);
        let img_h = f64::from(image.height);
        let min_scale = min_cover_scale(img_w, img_h, window.side);

        Ok(Self {
            img_w,
            img_h,
            side: window.side,
            scale: min_scale,
            translation: Offset::ZERO,
            scale_anchor: min_scale,
            translation_anchor: Offset::ZERO,
            min_scale,
            max_scale: min_scale * MAX_ZOOM_MULTIPLIER,
        })
    }

    /// Re-initialize to minimum zoom, centered. Idempotent.
    pub fn reset(&mut self) {
        self.scale = self.min_scale;
        self.translation = Offset::ZERO;
        self.scale_anchor = self.min_scale;
        self.translation_anchor = Offset::ZERO;
    }

    /// Current zoom factor (image space to screen space).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current pan offset in screen units.
    pub fn translation(&self) -> Offset {
        self.translation
    }

    /// Smallest scale satisfying the coverage invariant.
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Largest permitted scale (`min_scale * MAX_ZOOM_MULTIPLIER`).
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Natural image width in pixels, as f64 for the transform algebra.
    pub fn image_width(&self) -> f64 {
        self.img_w
    }

    /// Natural image height in pixels, as f64 for the transform algebra.
    pub fn image_height(&self) -> f64 {
        self.img_h
    }

    /// Crop window side in logical screen units.
    pub fn window_side(&self) -> f64 {
        self.side
    }

    /// Maximum legal pan offset on the x axis at the current scale.
    pub fn bound_x(&self) -> f64 {
        pan_bound(self.img_w, self.scale, self.side)
    }

    /// Maximum legal pan offset on the y axis at the current scale.
    pub fn bound_y(&self) -> f64 {
        pan_bound(self.img_h, self.scale, self.side)
    }

    /// Write a new scale, clamped to the legal zoom range, then re-clamp the
    /// translation against the new scale's pan envelope.
    pub(crate) fn set_scale_clamped(&mut self, candidate: f64) {
        self.scale = clamp(candidate, self.min_scale, self.max_scale);
        self.clamp_translation();
    }

    /// Write a new translation, clamped to the pan envelope of the current
    /// scale.
    pub(crate) fn set_translation_clamped(&mut self, candidate: Offset) {
        let bx = self.bound_x();
        let by = self.bound_y();
        self.translation = Offset {
            x: clamp(candidate.x, -bx, bx),
            y: clamp(candidate.y, -by, by),
        };
    }

    /// Re-clamp the current translation in place. Called after every scale
    /// change: shrinking the scale shrinks the pan envelope.
    pub(crate) fn clamp_translation(&mut self) {
        self.set_translation_clamped(self.translation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u32, h: u32) -> SourceImage {
        SourceImage::new(w, h, "file:///pick/original.jpg")
    }

    #[test]
    fn test_new_starts_at_min_scale_centered() {
        let state = TransformState::new(&image(2000, 3000), CropWindow::new(320.0)).unwrap();

        assert_eq!(state.scale(), 0.16);
        assert_eq!(state.translation(), Offset::ZERO);
        assert_eq!(state.min_scale(), 0.16);
        assert_eq!(state.max_scale(), 0.16 * 5.0);
    }

    #[test]
    fn test_new_rejects_zero_width() {
        let err = TransformState::new(&image(0, 100), CropWindow::new(320.0)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidImageDimensions { width: 0, height: 100 }
        ));
    }

    #[test]
    fn test_new_rejects_zero_height() {
        let err = TransformState::new(&image(100, 0), CropWindow::new(320.0)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidImageDimensions { .. }));
    }

    #[test]
    fn test_new_rejects_non_positive_window() {
        let err = TransformState::new(&image(100, 100), CropWindow::new(0.0)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidCropWindow { .. }));

        let err = TransformState::new(&image(100, 100), CropWindow::new(-5.0)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidCropWindow { .. }));
    }

    #[test]
    fn test_new_rejects_nan_window() {
        let err = TransformState::new(&image(100, 100), CropWindow::new(f64::NAN)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidCropWindow { .. }));
    }

    #[test]
    fn test_fit_screen_caps_side() {
        assert_eq!(CropWindow::fit_screen(280.0).side, 280.0);
        assert_eq!(CropWindow::fit_screen(420.0).side, 320.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = TransformState::new(&image(2000, 3000), CropWindow::new(320.0)).unwrap();

        state.set_scale_clamped(0.5);
        state.set_translation_clamped(Offset::new(40.0, -25.0));

        state.reset();
        let once = state.clone();
        state.reset();
        assert_eq!(state, once);
        assert_eq!(state.scale(), state.min_scale());
        assert_eq!(state.translation(), Offset::ZERO);
    }

    #[test]
    fn test_set_scale_clamps_to_range() {
        let mut state = TransformState::new(&image(2000, 3000), CropWindow::new(320.0)).unwrap();

        state.set_scale_clamped(100.0);
        assert_eq!(state.scale(), state.max_scale());

        state.set_scale_clamped(0.0001);
        assert_eq!(state.scale(), state.min_scale());
    }

    #[test]
    fn test_zoom_out_reclamps_translation() {
        let mut state = TransformState::new(&image(2000, 3000), CropWindow::new(320.0)).unwrap();

        // Zoom in and pan out to the edge of the envelope
        state.set_scale_clamped(0.32);
        let bx = state.bound_x();
        state.set_translation_clamped(Offset::new(bx, 0.0));
        assert_eq!(state.translation().x, bx);

        // Zooming back out shrinks the envelope; translation must follow
        state.set_scale_clamped(state.min_scale());
        assert!(state.translation().x.abs() <= state.bound_x() + 1e-9);
    }

    #[test]
    fn test_short_axis_locked_at_min_scale() {
        let mut state = TransformState::new(&image(2000, 1000), CropWindow::new(320.0)).unwrap();

        // At min scale the short axis has no slack: any pan on it clamps to 0
        state.set_translation_clamped(Offset::new(10.0, 10.0));
        assert_eq!(state.translation().y, 0.0);
        assert!(state.translation().x > 0.0);
    }
}
