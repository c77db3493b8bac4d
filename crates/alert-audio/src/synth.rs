//! Fire-and-forget alert playback.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use hazard_core::AlertClass;

use crate::pattern::pattern_for;

/// Cap on concurrently playing patterns. Triggers past the cap are dropped,
/// not queued.
const MAX_CONCURRENT_PLAYBACKS: usize = 4;

/// Platform audio output primitive.
///
/// Implementations must not block and must swallow their own backend
/// failures; a broken audio device must never crash the monitor.
pub trait ToneOutput: Send + Sync {
    fn play_tone(&self, freq_hz: f32, duration_ms: u64, gain: f32);
}

/// A [`ToneOutput`] that discards everything. Useful headless and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl ToneOutput for NullOutput {
    fn play_tone(&self, _freq_hz: f32, _duration_ms: u64, _gain: f32) {}
}

/// Synthesizes class-specific alert tone sequences.
///
/// Cheap to clone; clones share the playback bound.
#[derive(Clone)]
pub struct AlertSynth {
    output: Arc<dyn ToneOutput>,
    in_flight: Arc<Semaphore>,
}

impl AlertSynth {
    /// Create a synthesizer around a platform output.
    pub fn new(output: Arc<dyn ToneOutput>) -> Self {
        Self {
            output,
            in_flight: Arc::new(Semaphore::new(MAX_CONCURRENT_PLAYBACKS)),
        }
    }

    /// Play the pattern for an alert class. Fire-and-forget.
    ///
    /// Returns immediately; the pattern is stepped on a background task.
    /// When all playback slots are busy the trigger is dropped silently.
    /// Must be called from within a tokio runtime.
    pub fn play(&self, class: AlertClass) {
        let permit = match self.in_flight.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                debug!(?class, "playback slots exhausted, dropping trigger");
                return;
            }
        };

        let output = self.output.clone();
        let pattern = pattern_for(class);

        tokio::spawn(async move {
            let _permit = permit;

            if let Some(underlay) = pattern.underlay {
                output.play_tone(underlay.freq_hz, underlay.duration_ms, underlay.gain);
            }

            for step in &pattern.steps {
                if step.gain > 0.0 {
                    output.play_tone(step.freq_hz, step.duration_ms, step.gain);
                }
                tokio::time::sleep(Duration::from_millis(step.duration_ms)).await;
            }
        });
    }
}

impl std::fmt::Debug for AlertSynth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertSynth")
            .field("available_slots", &self.in_flight.available_permits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingOutput {
        tones: AtomicUsize,
    }

    impl ToneOutput for CountingOutput {
        fn play_tone(&self, _freq_hz: f32, _duration_ms: u64, _gain: f32) {
            self.tones.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_emits_tones() {
        let output = Arc::new(CountingOutput::default());
        let synth = AlertSynth::new(output.clone());

        synth.play(AlertClass::Standard);
        tokio::time::sleep(Duration::from_secs(5)).await;

        // Three beeps, no underlay.
        assert_eq!(output.tones.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emergency_includes_underlay() {
        let output = Arc::new(CountingOutput::default());
        let synth = AlertSynth::new(output.clone());

        synth.play(AlertClass::Emergency);
        tokio::time::sleep(Duration::from_secs(5)).await;

        // Six beeps plus the sustained underlay.
        assert_eq!(output.tones.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_triggers_are_bounded() {
        let output = Arc::new(CountingOutput::default());
        let synth = AlertSynth::new(output.clone());

        for _ in 0..32 {
            synth.play(AlertClass::Standard);
        }
        tokio::time::sleep(Duration::from_secs(10)).await;

        // At most MAX_CONCURRENT_PLAYBACKS patterns actually ran.
        assert!(output.tones.load(Ordering::SeqCst) <= MAX_CONCURRENT_PLAYBACKS * 3);
    }

    #[tokio::test]
    async fn test_play_does_not_block_caller() {
        let synth = AlertSynth::new(Arc::new(NullOutput));
        let start = std::time::Instant::now();
        synth.play(AlertClass::Emergency);
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
