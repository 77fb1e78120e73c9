//! Transform state and gesture composition.
//!
//! The view transform of a crop session is a uniform scale plus a pan
//! offset, driven by two concurrent gesture streams and constrained so the
//! image always fully covers the crop window.
//!
//! # Update Order
//!
//! One tick of input flows through the composer in a fixed order:
//! 1. Pinch sample (scale clamped, translation re-clamped to the new scale)
//! 2. Pan sample (candidate re-clamped against the post-pinch scale)
//!
//! Pan samples are dropped while two or more pointers are down; the pinch
//! recognizer owns translation semantics during multi-touch.

pub mod gesture;
pub mod state;

pub use gesture::{apply_frame, FrameInput, GesturePhase, PanSample, PinchSample};
pub use state::{CropWindow, Offset, SessionError, SourceImage, TransformState};
