//! Gesture streams and the per-tick composer.
//!
//! Two independent recognizers feed the engine: a single-pointer pan and a
//! two-pointer pinch. Each delivers cumulative samples relative to its own
//! gesture start; the composer merges at most one sample from each stream
//! into a single [`TransformState`] update per tick.
//!
//! # Merge Order
//!
//! The merge is deterministic and is the one piece of protocol in the
//! engine; change it and concurrent pan+pinch visibly jitters:
//!
//! 1. The pinch sample is applied first. The candidate scale is clamped to
//!    the legal zoom range, then the translation is re-clamped against the
//!    *new* scale's pan envelope.
//! 2. The pan candidate (computed against its gesture-start anchor) is then
//!    clamped against the post-pinch scale and written.
//! 3. While two or more pointers are down, pan samples are ignored entirely:
//!    the pinch recognizer owns translation semantics during multi-touch.
//!
//! Anchors snapshot on `Began` and fold back in on `Ended` (the commit).
//! Hosts deliver the final cumulative delta in a `Changed` sample before
//! sending `Ended`.

use serde::{Deserialize, Serialize};

use crate::transform::state::{Offset, TransformState};

/// Where a sample sits in its gesture's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    /// First sample: snapshot the anchor.
    Began,
    /// In-progress sample carrying a cumulative value from gesture start.
    Changed,
    /// Final sample: commit the current value into the anchor.
    Ended,
}

/// One sample from the pan recognizer.
///
/// `dx`/`dy` are the cumulative pointer displacement since the gesture
/// began, in logical screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanSample {
    pub phase: GesturePhase,
    pub dx: f64,
    pub dy: f64,
}

impl PanSample {
    pub fn began() -> Self {
        Self {
            phase: GesturePhase::Began,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub fn changed(dx: f64, dy: f64) -> Self {
        Self {
            phase: GesturePhase::Changed,
            dx,
            dy,
        }
    }

    pub fn ended() -> Self {
        Self {
            phase: GesturePhase::Ended,
            dx: 0.0,
            dy: 0.0,
        }
    }
}

/// One sample from the pinch recognizer.
///
/// `factor` is the ratio of the current pointer span to the span at gesture
/// start. A factor that is not finite and positive is invalid input and the
/// sample is a no-op for that tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchSample {
    pub phase: GesturePhase,
    pub factor: f64,
}

impl PinchSample {
    pub fn began() -> Self {
        Self {
            phase: GesturePhase::Began,
            factor: 1.0,
        }
    }

    pub fn changed(factor: f64) -> Self {
        Self {
            phase: GesturePhase::Changed,
            factor,
        }
    }

    pub fn ended() -> Self {
        Self {
            phase: GesturePhase::Ended,
            factor: 1.0,
        }
    }
}

/// Everything the composer consumes in one processing tick.
///
/// `pointers` is the number of pointers currently down, used for pinch
/// precedence: pan samples are discarded while `pointers >= 2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    pub pinch: Option<PinchSample>,
    pub pan: Option<PanSample>,
    pub pointers: u8,
}

impl FrameInput {
    /// A tick carrying only a pan sample.
    pub fn pan(sample: PanSample) -> Self {
        Self {
            pinch: None,
            pan: Some(sample),
            pointers: 1,
        }
    }

    /// A tick carrying only a pinch sample.
    pub fn pinch(sample: PinchSample) -> Self {
        Self {
            pinch: Some(sample),
            pan: None,
            pointers: 2,
        }
    }
}

/// Merge one tick of gesture input into the transform.
///
/// See the module docs for the ordering rule. The state's invariants hold on
/// return for any input, including invalid pinch factors.
pub fn apply_frame(state: &mut TransformState, input: &FrameInput) {
    if let Some(pinch) = input.pinch {
        match pinch.phase {
            GesturePhase::Began => {
                state.scale_anchor = state.scale();
            }
            GesturePhase::Changed => {
                if pinch.factor.is_finite() && pinch.factor > 0.0 {
                    state.set_scale_clamped(state.scale_anchor * pinch.factor);
                }
            }
            GesturePhase::Ended => {
                state.scale_anchor = state.scale();
            }
        }
    }

    if let Some(pan) = input.pan {
        // Pinch precedence: single-pointer pan semantics are suspended
        // while a second pointer is present.
        if input.pointers < 2 {
            match pan.phase {
                GesturePhase::Began => {
                    state.translation_anchor = state.translation();
                }
                GesturePhase::Changed => {
                    let anchor = state.translation_anchor;
                    state.set_translation_clamped(Offset::new(
                        anchor.x + pan.dx,
                        anchor.y + pan.dy,
                    ));
                }
                GesturePhase::Ended => {
                    state.translation_anchor = state.translation();
                }
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
