//! Symbol classifier: closure duration → Dot / Dash / Delete / Ignore
//!
//! Bands (upper bound inclusive):
//! - d ≤ DOT_MAX               → Dot
//! - DOT_MAX < d ≤ DASH_MAX    → Dash
//! - DASH_MAX < d ≤ DELETE_MAX → DeleteCommand
//! - d > DELETE_MAX            → Ignore

use std::time::Duration;
use crate::types::{Classification, ClosureEvent, DecoderConfig};

/// Fixed-band duration classifier
#[derive(Debug, Clone, Copy)]
pub struct SymbolClassifier {
    dot_max: Duration,
    dash_max: Duration,
    delete_max: Duration,
}

impl Default for SymbolClassifier {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl SymbolClassifier {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            dot_max: config.dot_max(),
            dash_max: config.dash_max(),
            delete_max: config.delete_max(),
        }
    }

    /// Classify a closure length
    pub fn classify(&self, duration: Duration) -> Classification {
        if duration <= self.dot_max {
            Classification::Dot
        } else if duration <= self.dash_max {
            Classification::Dash
        } else if duration <= self.delete_max {
            Classification::DeleteCommand
        } else {
            Classification::Ignore
        }
    }

    /// Classify a completed closure. A closure that ends before it starts is noise.
    pub fn classify_closure(&self, event: &ClosureEvent) -> Classification {
        event
            .duration()
            .map(|d| self.classify(d))
            .unwrap_or(Classification::Ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_bands() {
        let c = SymbolClassifier::default();
        assert_eq!(c.classify(ms(0)), Classification::Dot);
        assert_eq!(c.classify(ms(100)), Classification::Dot);
        assert_eq!(c.classify(ms(400)), Classification::Dash);
        assert_eq!(c.classify(ms(900)), Classification::DeleteCommand);
        assert_eq!(c.classify(ms(1500)), Classification::Ignore);
    }

    #[test]
    fn test_boundaries_belong_to_lower_band() {
        let c = SymbolClassifier::default();
        assert_eq!(c.classify(ms(250)), Classification::Dot);
        assert_eq!(c.classify(ms(250) + Duration::from_nanos(1)), Classification::Dash);
        assert_eq!(c.classify(ms(600)), Classification::Dash);
        assert_eq!(c.classify(ms(600) + Duration::from_nanos(1)), Classification::DeleteCommand);
        assert_eq!(c.classify(ms(1200)), Classification::DeleteCommand);
        assert_eq!(c.classify(ms(1200) + Duration::from_nanos(1)), Classification::Ignore);
    }

    #[test]
    fn test_every_millisecond_lands_in_one_band() {
        let c = SymbolClassifier::default();
        for d in 0..=2000u64 {
            let expected = match d {
                0..=250 => Classification::Dot,
                251..=600 => Classification::Dash,
                601..=1200 => Classification::DeleteCommand,
                _ => Classification::Ignore,
            };
            assert_eq!(c.classify(ms(d)), expected, "duration {}ms", d);
        }
    }

    #[test]
    fn test_custom_bands() {
        let config = DecoderConfig {
            dot_max_ms: 100,
            dash_max_ms: 300,
            delete_max_ms: 800,
            ..Default::default()
        };
        let c = SymbolClassifier::new(&config);
        assert_eq!(c.classify(ms(150)), Classification::Dash);
        assert_eq!(c.classify(ms(500)), Classification::DeleteCommand);
        assert_eq!(c.classify(ms(900)), Classification::Ignore);
    }

    #[test]
    fn test_backwards_closure_is_ignored() {
        let c = SymbolClassifier::default();
        let event = ClosureEvent { start_time: ms(1000), end_time: ms(900) };
        assert_eq!(c.classify_closure(&event), Classification::Ignore);
    }
}
