//! Audible alert synthesis.
//!
//! Generates a class-specific tone sequence through an injected
//! [`ToneOutput`] capability. Playback is fire-and-forget: [`AlertSynth::play`]
//! returns immediately, playback failures never reach the caller, and the
//! number of in-flight playbacks is bounded.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use alert_audio::{AlertSynth, NullOutput};
//! use hazard_core::AlertClass;
//!
//! let synth = AlertSynth::new(Arc::new(NullOutput));
//! synth.play(AlertClass::Emergency);
//! ```

mod pattern;
mod synth;

pub use pattern::{pattern_for, ToneDef, TonePattern};
pub use synth::{AlertSynth, NullOutput, ToneOutput};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
