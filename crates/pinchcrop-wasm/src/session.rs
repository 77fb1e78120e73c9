//! WASM bindings for the crop session.
//!
//! The host owns the gesture recognizers (touch handlers on the crop
//! screen) and feeds their samples here, one composed frame per tick.
//! Confirm hands the decoded source pixels plus a `make_uri` callback of
//! type `(Uint8Array) => string` that stores the encoded JPEG and mints the
//! asset handle (typically `URL.createObjectURL` over a Blob).
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new WasmCropSession(image.width, image.height, pickedUri,
//!                                     window.innerWidth);
//! session.pinch_began();
//! session.pinch_changed(span / startSpan);
//! session.pinch_ended();
//!
//! const uri = session.confirm(pixels, (jpeg) =>
//!   URL.createObjectURL(new Blob([jpeg], { type: "image/jpeg" })));
//! ```

use pinchcrop_core::{
    render_crop, AssetUri, ConfirmOutcome, CropResult, CropSession, CropWindow, FrameInput,
    OutputProducer, PanSample, PinchSample, PixelBuffer, ProduceError, SourceImage,
};
use wasm_bindgen::prelude::*;

use crate::types::JsPixelBuffer;

/// Producer backed by host-supplied pixels and a URI-minting callback.
struct CallbackProducer<'a> {
    pixels: &'a PixelBuffer,
    make_uri: &'a js_sys::Function,
    quality: Option<u8>,
}

impl OutputProducer for CallbackProducer<'_> {
    fn produce(&self, _source: &SourceImage, crop: &CropResult) -> Result<AssetUri, ProduceError> {
        let jpeg = render_crop(self.pixels, crop, self.quality)?;

        let bytes = js_sys::Uint8Array::from(jpeg.as_slice());
        let uri = self
            .make_uri
            .call1(&JsValue::NULL, &bytes)
            .map_err(|e| ProduceError::Io(format!("make_uri callback threw: {:?}", e)))?;
        uri.as_string()
            .map(AssetUri::new)
            .ok_or_else(|| ProduceError::Io("make_uri callback did not return a string".to_string()))
    }
}

/// An interactive crop session exposed to JavaScript.
#[wasm_bindgen]
pub struct WasmCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl WasmCropSession {
    /// Open a session for an image of natural size `width x height` with
    /// handle `uri`, sizing the crop window from the available screen width
    /// (capped at 320 logical units).
    ///
    /// Throws on zero image dimensions or a non-positive window side.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        uri: String,
        screen_width: f64,
    ) -> Result<WasmCropSession, JsValue> {
        let image = SourceImage::new(width, height, uri);
        let inner = CropSession::new(image, CropWindow::fit_screen(screen_width))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmCropSession { inner })
    }

    /// Feed one composed frame of gesture input, as a structured object:
    /// `{ pinch?: { phase, factor }, pan?: { phase, dx, dy }, pointers }`.
    pub fn apply_frame(&mut self, input: JsValue) -> Result<(), JsValue> {
        let input: FrameInput =
            serde_wasm_bindgen::from_value(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.apply_frame(&input);
        Ok(())
    }

    // Per-stream conveniences for hosts that don't batch frames.

    pub fn pan_began(&mut self) {
        self.inner.apply_frame(&FrameInput::pan(PanSample::began()));
    }

    /// Pan with the cumulative displacement since the gesture began, in
    /// logical screen units.
    pub fn pan_changed(&mut self, dx: f64, dy: f64) {
        self.inner
            .apply_frame(&FrameInput::pan(PanSample::changed(dx, dy)));
    }

    pub fn pan_ended(&mut self) {
        self.inner.apply_frame(&FrameInput::pan(PanSample::ended()));
    }

    pub fn pinch_began(&mut self) {
        self.inner
            .apply_frame(&FrameInput::pinch(PinchSample::began()));
    }

    /// Pinch with the ratio of the current pointer span to the span at
    /// gesture start. Non-positive factors are ignored.
    pub fn pinch_changed(&mut self, factor: f64) {
        self.inner
            .apply_frame(&FrameInput::pinch(PinchSample::changed(factor)));
    }

    pub fn pinch_ended(&mut self) {
        self.inner
            .apply_frame(&FrameInput::pinch(PinchSample::ended()));
    }

    /// Return to minimum zoom, centered.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Swap in a newly picked image; the transform re-initializes.
    pub fn load_image(&mut self, width: u32, height: u32, uri: String) -> Result<(), JsValue> {
        self.inner
            .load_image(SourceImage::new(width, height, uri))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current zoom factor, for rendering the preview transform
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform().scale()
    }

    /// Current pan offset x, in logical screen units
    #[wasm_bindgen(getter)]
    pub fn translation_x(&self) -> f64 {
        self.inner.transform().translation().x
    }

    /// Current pan offset y, in logical screen units
    #[wasm_bindgen(getter)]
    pub fn translation_y(&self) -> f64 {
        self.inner.transform().translation().y
    }

    #[wasm_bindgen(getter)]
    pub fn min_scale(&self) -> f64 {
        self.inner.transform().min_scale()
    }

    #[wasm_bindgen(getter)]
    pub fn max_scale(&self) -> f64 {
        self.inner.transform().max_scale()
    }

    /// Side of the crop window, in logical screen units
    #[wasm_bindgen(getter)]
    pub fn window_side(&self) -> f64 {
        self.inner.window().side
    }

    /// Snapshot of the full transform state as a structured object:
    /// `{ scale, translation, min_scale, max_scale, ... }`. The scalar
    /// getters above are cheaper for per-frame preview rendering; this is
    /// for debugging and state persistence.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.transform())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Resolve the source-pixel crop square for the current transform, as
    /// `{ origin_x, origin_y, size, output_size }`.
    ///
    /// Throws on a degenerate (sub-pixel) crop; `confirm` handles that case
    /// by falling back instead.
    pub fn resolve_crop(&self) -> Result<JsValue, JsValue> {
        let crop = self
            .inner
            .resolve()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&crop).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Commit the crop and return the final asset URI.
    ///
    /// Renders crop -> square resize -> JPEG over `pixels`, then calls
    /// `make_uri` with the encoded bytes to mint the handle. Never throws
    /// for render or callback failures: those fall back to the original
    /// image's URI, with the cause logged to the console.
    pub fn confirm(
        &self,
        pixels: &JsPixelBuffer,
        make_uri: &js_sys::Function,
        quality: Option<u8>,
    ) -> String {
        let producer = CallbackProducer {
            pixels: pixels.as_core(),
            make_uri,
            quality,
        };

        match self.inner.confirm(&producer) {
            ConfirmOutcome::Produced { uri, .. } => uri.into_string(),
            ConfirmOutcome::Fallback { uri, reason } => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "pinchcrop: falling back to original asset: {reason}"
                )));
                uri.into_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> WasmCropSession {
        WasmCropSession::new(2000, 3000, "file:///pick/original.jpg".to_string(), 420.0).unwrap()
    }

    #[test]
    fn test_constructor_fits_window_to_screen() {
        let s = session();
        // 420 screen units cap at the 320 window side
        assert_eq!(s.window_side(), 320.0);

        let narrow =
            WasmCropSession::new(2000, 3000, "file:///x".to_string(), 280.0).unwrap();
        assert_eq!(narrow.window_side(), 280.0);
    }

    #[test]
    fn test_gesture_conveniences_drive_transform() {
        let mut s = session();
        let min = s.min_scale();

        s.pinch_began();
        s.pinch_changed(2.0);
        s.pinch_ended();
        assert_eq!(s.scale(), min * 2.0);

        s.pan_began();
        s.pan_changed(32.0, -10.0);
        s.pan_ended();
        assert_eq!(s.translation_x(), 32.0);
        assert_eq!(s.translation_y(), -10.0);
    }

    #[test]
    fn test_invalid_pinch_factor_ignored() {
        let mut s = session();
        s.pinch_began();
        s.pinch_changed(-3.0);
        s.pinch_ended();
        assert_eq!(s.scale(), s.min_scale());
    }

    #[test]
    fn test_reset_restores_initial_view() {
        let mut s = session();
        s.pinch_began();
        s.pinch_changed(4.0);
        s.pinch_ended();
        s.pan_began();
        s.pan_changed(50.0, 50.0);
        s.pan_ended();

        s.reset();
        assert_eq!(s.scale(), s.min_scale());
        assert_eq!(s.translation_x(), 0.0);
        assert_eq!(s.translation_y(), 0.0);
    }
}
