//! Pinchcrop WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes the pinchcrop-core crop session to JavaScript/
//! TypeScript hosts: the quiz client's profile screen owns the touch
//! handlers and the image picker, and drives the engine through
//! [`WasmCropSession`].
//!
//! # Module Structure
//!
//! - `session` - The crop session bindings (gestures, resolve, confirm)
//! - `types` - WASM-compatible pixel buffer wrapper
//!
//! # Usage
//!
//! ```typescript
//! import init, { WasmCropSession, JsPixelBuffer } from '@pinchcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new WasmCropSession(w, h, pickedUri, screenWidth);
//! // ...feed gestures, then:
//! const uri = session.confirm(pixels, mintBlobUri);
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

// Re-export public types
pub use session::WasmCropSession;
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
