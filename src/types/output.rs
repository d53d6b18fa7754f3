//! Output structures for terminal display

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::EyeState;

/// Snapshot of the decoder after a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderOutput {
    /// Wall-clock time the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Stream time of the frame (milliseconds)
    pub t_ms: u64,
    /// Current eye state
    pub eye: EyeState,
    /// In-progress letter as dots and dashes
    pub pending: String,
    /// Decoded message so far
    pub text: String,
    /// Transient feedback, if unexpired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Code of the last event this frame produced, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<String>,
}

impl DecoderOutput {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let mut line = format!(
            "{} {} | morse={} | text=\"{}\"",
            self.eye.emoji(),
            format!("{:>7.3}s", self.t_ms as f64 / 1000.0).dimmed(),
            self.pending.yellow(),
            self.text.bold(),
        );
        if let Some(ref feedback) = self.feedback {
            line.push_str(&format!(" | {}", feedback.red().bold()));
        }
        line
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "t={:.3}s | eye={} | morse={} | text=\"{}\" | feedback={}",
            self.t_ms as f64 / 1000.0,
            self.eye,
            self.pending,
            self.text,
            self.feedback.as_deref().unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecoderOutput {
        DecoderOutput {
            timestamp: Utc::now(),
            t_ms: 1500,
            eye: EyeState::Open,
            pending: "..-".to_string(),
            text: "HI".to_string(),
            feedback: None,
            last_event: None,
        }
    }

    #[test]
    fn test_parseable_string() {
        let out = sample();
        assert_eq!(
            out.to_parseable_string(),
            "t=1.500s | eye=OPEN | morse=..- | text=\"HI\" | feedback=-"
        );
    }

    #[test]
    fn test_feedback_skipped_when_absent() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("feedback"));
        assert!(json.contains("\"pending\":\"..-\""));
    }
}
