//! WASM-compatible wrapper types for pixel data.
//!
//! This module provides the JavaScript-friendly pixel buffer the confirm
//! path consumes, handling the conversion between Rust and JavaScript data
//! representations.

use pinchcrop_core::PixelBuffer;
use wasm_bindgen::prelude::*;

/// An RGB pixel buffer wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`. wasm-bindgen's finalizer
/// releases the WASM-side memory automatically; call `free()` to release it
/// eagerly for large images.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from dimensions and RGB pixel data (3 bytes per
    /// pixel, row-major order).
    ///
    /// Throws if the data length doesn't match `width * height * 3` or a
    /// dimension is zero.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        let inner = PixelBuffer::new(width, height, pixels)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsPixelBuffer { inner })
    }

    /// Get the buffer width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the buffer height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: this copies the data out of WASM memory.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsPixelBuffer {
    /// Borrow the wrapped core buffer for the render pipeline.
    pub(crate) fn as_core(&self) -> &PixelBuffer {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_buffer() {
        let buf = JsPixelBuffer::new(4, 2, vec![0u8; 4 * 2 * 3]).unwrap();
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.byte_length(), 24);
    }

}

/// WASM-specific tests that require JsValue.
///
/// These tests drive `JsPixelBuffer::new` down its Err branch, which
/// constructs a `JsValue` and can only run on wasm32 targets. Use
/// `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_mismatched_length_rejected() {
        assert!(JsPixelBuffer::new(4, 2, vec![0u8; 23]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_zero_dimension_rejected() {
        assert!(JsPixelBuffer::new(0, 2, vec![]).is_err());
    }
}
