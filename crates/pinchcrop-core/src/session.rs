//! Crop session lifecycle.
//!
//! A [`CropSession`] owns exactly one source image, one crop window and one
//! transform state; nothing is shared across sessions, and dropping the
//! session is cancellation. Mutation is single-writer through `&mut self`:
//! the host's interaction loop is the only place gestures are applied.
//!
//! # Confirm semantics
//!
//! `confirm` is infallible from the caller's point of view. Producing the
//! cropped asset is a cosmetic, best-effort enhancement: a degenerate crop
//! skips the producer, and a producer failure falls back to the original,
//! uncropped asset URI. The failure is reported to the host's logging layer
//! (the wasm bindings log it), never to the user flow.

use crate::produce::{AssetUri, OutputProducer};
use crate::resolve::{resolve_crop, CropResult, ResolveError};
use crate::transform::{
    apply_frame, CropWindow, FrameInput, SessionError, SourceImage, TransformState,
};

/// One interactive crop session over one source image.
#[derive(Debug, Clone)]
pub struct CropSession {
    image: SourceImage,
    window: CropWindow,
    transform: TransformState,
}

impl CropSession {
    /// Open a session at minimum zoom, centered.
    ///
    /// # Errors
    ///
    /// Fails fast, before any gesture is processed, on a zero-sized image
    /// ([`SessionError::InvalidImageDimensions`]) or a non-positive window
    /// ([`SessionError::InvalidCropWindow`]).
    pub fn new(image: SourceImage, window: CropWindow) -> Result<Self, SessionError> {
        let transform = TransformState::new(&image, window)?;
        Ok(Self {
            image,
            window,
            transform,
        })
    }

    /// The session's source image.
    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    /// The session's crop window.
    pub fn window(&self) -> CropWindow {
        self.window
    }

    /// Read-only view of the current transform.
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Feed one tick of composed gesture input into the transform.
    pub fn apply_frame(&mut self, input: &FrameInput) {
        apply_frame(&mut self.transform, input);
    }

    /// Return to minimum zoom, centered. Idempotent.
    pub fn reset(&mut self) {
        self.transform.reset();
    }

    /// Replace the source image mid-session and re-initialize the transform.
    ///
    /// On error the session keeps its previous image and transform.
    pub fn load_image(&mut self, image: SourceImage) -> Result<(), SessionError> {
        let transform = TransformState::new(&image, self.window)?;
        self.image = image;
        self.transform = transform;
        Ok(())
    }

    /// Resolve the source-pixel square currently visible in the window.
    pub fn resolve(&self) -> Result<CropResult, ResolveError> {
        resolve_crop(&self.transform)
    }

    /// Commit the crop: resolve, invoke the producer once, return the final
    /// asset URI.
    ///
    /// Falls back to the original image's URI when the crop is degenerate
    /// (producer skipped) or the producer fails. The outcome reports which
    /// path was taken so hosts can log it.
    pub fn confirm<P: OutputProducer>(&self, producer: &P) -> ConfirmOutcome {
        let crop = match self.resolve() {
            Ok(crop) => crop,
            Err(err) => {
                return ConfirmOutcome::Fallback {
                    uri: self.image.uri.clone(),
                    reason: err.to_string(),
                }
            }
        };

        match producer.produce(&self.image, &crop) {
            Ok(uri) => ConfirmOutcome::Produced { uri, crop },
            Err(err) => ConfirmOutcome::Fallback {
                uri: self.image.uri.clone(),
                reason: err.to_string(),
            },
        }
    }
}

/// Result of a confirm action. Always carries a usable asset URI.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// The producer rendered the cropped asset.
    Produced { uri: AssetUri, crop: CropResult },
    /// The original asset was kept; `reason` is for the host's logs only.
    Fallback { uri: AssetUri, reason: String },
}

impl ConfirmOutcome {
    /// The asset URI to hand back to the user flow, whichever path was
    /// taken.
    pub fn uri(&self) -> &AssetUri {
        match self {
            ConfirmOutcome::Produced { uri, .. } => uri,
            ConfirmOutcome::Fallback { uri, .. } => uri,
        }
    }

    /// True when the original asset was returned unchanged.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ConfirmOutcome::Fallback { .. })
    }

    /// Consume the outcome, keeping only the URI.
    pub fn into_uri(self) -> AssetUri {
        match self {
            ConfirmOutcome::Produced { uri, .. } => uri,
            ConfirmOutcome::Fallback { uri, .. } => uri,
        }
    }
}
