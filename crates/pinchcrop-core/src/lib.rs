//! Pinchcrop Core - Interactive image crop engine
//!
//! This crate implements the gesture-driven crop engine behind profile
//! picture editing: a pan/pinch-driven affine view over a source image,
//! constrained so the image always fully covers a square crop window, from
//! which a pixel-exact source rectangle is resolved and rendered to a
//! fixed-size square asset.
//!
//! # Pipeline
//!
//! Pointer events -> gesture recognizers -> [`transform::apply_frame`] ->
//! [`transform::TransformState`] -> (on confirm) [`resolve::resolve_crop`]
//! -> [`produce::OutputProducer`] -> final asset URI.
//!
//! The engine is a pure in-process library: the platform image picker, the
//! screens around it and the network are the host's business. The one
//! external boundary is the output producer, which hosts run off the
//! interaction thread.

pub mod geometry;
pub mod produce;
pub mod resolve;
pub mod session;
pub mod transform;

pub use produce::{render_crop, AssetUri, OutputProducer, PixelBuffer, ProduceError};
pub use resolve::{resolve_crop, CropResult, ResolveError};
pub use session::{ConfirmOutcome, CropSession};
pub use transform::{
    apply_frame, CropWindow, FrameInput, GesturePhase, Offset, PanSample, PinchSample,
    SessionError, SourceImage, TransformState,
};

/// Maximum zoom as a multiple of the minimum cover scale (K).
pub const MAX_ZOOM_MULTIPLIER: f64 = 5.0;

/// Side cap for the final output asset, in pixels.
pub const MAX_OUTPUT_SIZE: u32 = 1024;

/// Cap on the crop window side, in logical screen units.
pub const MAX_WINDOW_SIDE: f64 = 320.0;

/// JPEG quality used by the render pipeline when the host doesn't override.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
