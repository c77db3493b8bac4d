//! Tone patterns per alert class.

use hazard_core::AlertClass;

/// One tone in a pattern. `gain == 0.0` is a rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneDef {
    pub freq_hz: f32,
    pub duration_ms: u64,
    pub gain: f32,
}

impl ToneDef {
    pub const fn new(freq_hz: f32, duration_ms: u64, gain: f32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            gain,
        }
    }

    pub const fn rest(duration_ms: u64) -> Self {
        Self::new(0.0, duration_ms, 0.0)
    }
}

/// A playable tone sequence, optionally layered over one sustained tone.
#[derive(Debug, Clone, PartialEq)]
pub struct TonePattern {
    /// Foreground tones, played in order.
    pub steps: Vec<ToneDef>,
    /// Low sustained tone started together with the first step.
    pub underlay: Option<ToneDef>,
}

impl TonePattern {
    /// Total foreground duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_ms).sum()
    }
}

/// Build the tone pattern for an alert class.
///
/// Emergency: six short high-pitch bursts over a low sustained tone.
/// Standard: three slower mid-pitch beeps, no underlay.
pub fn pattern_for(class: AlertClass) -> TonePattern {
    match class {
        AlertClass::Emergency => {
            let mut steps = Vec::with_capacity(12);
            for _ in 0..6 {
                steps.push(ToneDef::new(1568.0, 120, 0.9));
                steps.push(ToneDef::rest(80));
            }
            TonePattern {
                underlay: Some(ToneDef::new(220.0, steps.iter().map(|s| s.duration_ms).sum(), 0.5)),
                steps,
            }
        }
        AlertClass::Standard => {
            let mut steps = Vec::with_capacity(6);
            for _ in 0..3 {
                steps.push(ToneDef::new(988.0, 250, 0.7));
                steps.push(ToneDef::rest(250));
            }
            TonePattern {
                steps,
                underlay: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_is_faster_and_layered() {
        let emergency = pattern_for(AlertClass::Emergency);
        let standard = pattern_for(AlertClass::Standard);

        assert!(emergency.underlay.is_some());
        assert!(standard.underlay.is_none());

        let emergency_tones = emergency.steps.iter().filter(|s| s.gain > 0.0).count();
        let standard_tones = standard.steps.iter().filter(|s| s.gain > 0.0).count();
        assert!(emergency_tones > standard_tones);

        let emergency_beep = emergency.steps.iter().find(|s| s.gain > 0.0).unwrap();
        let standard_beep = standard.steps.iter().find(|s| s.gain > 0.0).unwrap();
        assert!(emergency_beep.freq_hz > standard_beep.freq_hz);
        assert!(emergency_beep.duration_ms < standard_beep.duration_ms);
    }

    #[test]
    fn test_underlay_spans_pattern() {
        let emergency = pattern_for(AlertClass::Emergency);
        let underlay = emergency.underlay.unwrap();
        assert_eq!(underlay.duration_ms, emergency.duration_ms());
    }
}
