//! Output production: the one external boundary of the crop engine.
//!
//! On confirm, a resolved [`CropResult`](crate::resolve::CropResult) and the
//! session's source image are handed to an [`OutputProducer`], which crops,
//! resizes to the output side and encodes the final asset. The engine never
//! requires the producer to succeed: any failure degrades to the original,
//! uncropped asset (see [`crate::session::CropSession::confirm`]).
//!
//! The concrete in-process pipeline lives in [`pipeline`]; hosts that render
//! elsewhere (a worker, a native codec service) implement the trait
//! themselves.

mod pipeline;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolve::CropResult;
use crate::transform::SourceImage;

pub use pipeline::{crop_pixels, encode_jpeg, render_crop, resize_square, PixelBuffer};

/// Errors that can occur while producing the output asset.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// Pixel data length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The crop rectangle falls outside the pixel buffer.
    #[error("Crop rectangle {origin_x},{origin_y} +{size} exceeds a {width}x{height} buffer")]
    CropOutOfBounds {
        origin_x: u32,
        origin_y: u32,
        size: u32,
        width: u32,
        height: u32,
    },

    /// Resizing to the output side failed.
    #[error("Resize failed: {0}")]
    ResizeFailed(String),

    /// JPEG encoding failed.
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// The producer could not reach or store the asset.
    #[error("Asset I/O failed: {0}")]
    Io(String),
}

/// An opaque asset handle, owned and interpreted by the host.
///
/// The engine only threads URIs through: the source image arrives with one,
/// and confirm returns one (the produced asset's, or the original's on
/// fallback).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetUri(String);

impl AssetUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for AssetUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl From<&str> for AssetUri {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

impl fmt::Display for AssetUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The crop-render-store boundary, invoked once per confirm.
///
/// Implementations run off the interaction thread (a worker or codec
/// service); the session holds no reference to them afterwards, so an
/// in-flight call may finish in the background after the session is gone.
pub trait OutputProducer {
    /// Produce the final square asset for `crop` and return its handle.
    fn produce(&self, source: &SourceImage, crop: &CropResult) -> Result<AssetUri, ProduceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_uri_roundtrip() {
        let uri = AssetUri::new("file:///avatars/u17.jpg");
        assert_eq!(uri.as_str(), "file:///avatars/u17.jpg");
        assert_eq!(uri.to_string(), "file:///avatars/u17.jpg");
        assert_eq!(AssetUri::from("x"), AssetUri::new(String::from("x")));
    }

    #[test]
    fn test_produce_error_display() {
        let err = ProduceError::InvalidPixelData {
            expected: 300,
            actual: 299,
        };
        assert_eq!(
            err.to_string(),
            "Invalid pixel data: expected 300 bytes (width * height * 3), got 299"
        );

        let err = ProduceError::CropOutOfBounds {
            origin_x: 90,
            origin_y: 0,
            size: 20,
            width: 100,
            height: 100,
        };
        assert!(err.to_string().contains("90,0 +20"));
    }
}
