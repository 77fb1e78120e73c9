//! Crop resolution: inverting the view transform into source pixels.
//!
//! Given a committed [`TransformState`], this module computes the rectangle
//! of the source image currently visible inside the crop window, expressed
//! in source-image pixel coordinates. The resolution is a pure function of
//! the transform; it carries no hidden state.
//!
//! # Coordinate Inversion
//!
//! The image is centered in the window, scaled, then panned. The window's
//! top-left corner therefore sits at
//! `-(displayed_extent - side) / 2 - translation` from the image's top-left,
//! and dividing by the scale maps that point back into source pixels. The
//! pan-bound invariant guarantees the window lies inside the displayed
//! image, so the clamps below only absorb floating-point slack.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::TransformState;
use crate::MAX_OUTPUT_SIZE;

/// Errors surfaced while resolving a crop.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The resolved square is one source pixel or smaller. Recoverable: the
    /// caller skips the output producer and keeps the original asset.
    #[error("Degenerate crop: resolved square of {size:.3}px is too small to render")]
    DegenerateCrop { size: f64 },
}

/// A resolved crop rectangle in source-image pixel coordinates.
///
/// `size` is the side of the square actually cut from the source;
/// `output_size` is the side of the final rendered asset, never exceeding
/// [`MAX_OUTPUT_SIZE`] and never upscaling beyond the cropped pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropResult {
    /// Left edge of the crop square, in source pixels.
    pub origin_x: u32,
    /// Top edge of the crop square, in source pixels.
    pub origin_y: u32,
    /// Side of the crop square, in source pixels.
    pub size: u32,
    /// Side of the final output asset, in pixels.
    pub output_size: u32,
}

/// Resolve the source-pixel square visible in the crop window.
///
/// # Errors
///
/// Returns [`ResolveError::DegenerateCrop`] when the visible square is one
/// source pixel or smaller (pathological zoom on a tiny image).
pub fn resolve_crop(state: &TransformState) -> Result<CropResult, ResolveError> {
    let scale = state.scale();
    let side = state.window_side();
    let img_w = state.image_width();
    let img_h = state.image_height();
    let translation = state.translation();

    // Image top-left corner in crop-window coordinates.
    let displayed_w = img_w * scale;
    let displayed_h = img_h * scale;
    let image_left = -displayed_w / 2.0 + side / 2.0 + translation.x;
    let image_top = -displayed_h / 2.0 + side / 2.0 + translation.y;

    // Invert into source-pixel space.
    let origin_x = (-image_left / scale).max(0.0);
    let origin_y = (-image_top / scale).max(0.0);

    // The window maps to a side/scale square of source pixels, clamped to
    // the image extent.
    let raw_side = side / scale;
    let crop_w = raw_side.min(img_w - origin_x);
    let crop_h = raw_side.min(img_h - origin_y);
    let square = crop_w.min(crop_h);

    if square <= 1.0 {
        return Err(ResolveError::DegenerateCrop { size: square });
    }

    let size = square.floor();
    let output_size = size.min(f64::from(MAX_OUTPUT_SIZE));

    Ok(CropResult {
        origin_x: origin_x.floor() as u32,
        origin_y: origin_y.floor() as u32,
        size: size as u32,
        output_size: output_size as u32,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::transform::{
        apply_frame, CropWindow, FrameInput, PanSample, PinchSample, SourceImage, TransformState,
    };
    use proptest::prelude::*;

    fn committed_state_strategy() -> impl Strategy<Value = TransformState> {
        (
            2u32..=6000,
            2u32..=6000,
            64.0f64..=320.0,
            1.0f64..=5.0,
            -1e4f64..=1e4,
            -1e4f64..=1e4,
        )
            .prop_map(|(w, h, side, zoom, dx, dy)| {
                let image = SourceImage::new(w, h, "mem://img");
                let mut state = TransformState::new(&image, CropWindow::new(side)).unwrap();
                apply_frame(&mut state, &FrameInput::pinch(PinchSample::began()));
                apply_frame(&mut state, &FrameInput::pinch(PinchSample::changed(zoom)));
                apply_frame(&mut state, &FrameInput::pinch(PinchSample::ended()));
                apply_frame(&mut state, &FrameInput::pan(PanSample::began()));
                apply_frame(&mut state, &FrameInput::pan(PanSample::changed(dx, dy)));
                apply_frame(&mut state, &FrameInput::pan(PanSample::ended()));
                state
            })
    }

    proptest! {
        /// Property: a resolved crop always lies inside the source image.
        #[test]
        fn prop_crop_inside_image(state in committed_state_strategy()) {
            if let Ok(crop) = resolve_crop(&state) {
                let img_w = state.image_width() as u32;
                let img_h = state.image_height() as u32;
                prop_assert!(crop.origin_x + crop.size <= img_w);
                prop_assert!(crop.origin_y + crop.size <= img_h);
            }
        }

        /// Property: the resolved square is positive and the output side is
        /// bounded by both the square and MAX_OUTPUT_SIZE.
        #[test]
        fn prop_output_size_bounds(state in committed_state_strategy()) {
            if let Ok(crop) = resolve_crop(&state) {
                prop_assert!(crop.size >= 1);
                prop_assert!(crop.output_size >= 1);
                prop_assert!(crop.output_size <= crop.size);
                prop_assert!(crop.output_size <= MAX_OUTPUT_SIZE);
            }
        }

        /// Property: the resolver only fails on sub-pixel squares, which a
        /// committed state can reach only when the image's short axis at max
        /// zoom maps below one source pixel.
        #[test]
        fn prop_failure_implies_subpixel_window(state in committed_state_strategy()) {
            if let Err(ResolveError::DegenerateCrop { size }) = resolve_crop(&state) {
                prop_assert!(size <= 1.0);
                prop_assert!(state.window_side() / state.scale() <= 1.0 + 1e-6);
            }
        }

        /// Property: the resolved square matches the window's source-pixel
        /// footprint wherever the image extent doesn't truncate it.
        #[test]
        fn prop_size_matches_window_footprint(state in committed_state_strategy()) {
            if let Ok(crop) = resolve_crop(&state) {
                let footprint = state.window_side() / state.scale();
                prop_assert!(f64::from(crop.size) <= footprint + 1e-6);
                // Never more than one pixel short of the footprint unless
                // clamped by the image edge
                let short_axis = state.image_width().min(state.image_height());
                if footprint <= short_axis {
                    prop_assert!(f64::from(crop.size) > footprint - 2.0);
                }
            }
        }

        /// Property: resolution at minimum zoom is the image's central
        /// square regardless of aspect ratio.
        #[test]
        fn prop_min_zoom_central_square(
            img_w in 2u32..=6000,
            img_h in 2u32..=6000,
            side in 64.0f64..=320.0,
        ) {
            let image = SourceImage::new(img_w, img_h, "mem://img");
            let state = TransformState::new(&image, CropWindow::new(side)).unwrap();
            let crop = resolve_crop(&state).unwrap();

            let short = img_w.min(img_h);
            prop_assert!(crop.size >= short - 1 && crop.size <= short);
            let expected_x = (f64::from(img_w) - f64::from(short)) / 2.0;
            let expected_y = (f64::from(img_h) - f64::from(short)) / 2.0;
            prop_assert!((f64::from(crop.origin_x) - expected_x).abs() <= 1.0);
            prop_assert!((f64::from(crop.origin_y) - expected_y).abs() <= 1.0);
        }
    }
}
