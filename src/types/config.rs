//! Decoder tunables
//!
//! All thresholds are whole milliseconds. Validation happens once, when a
//! config is built from user input; the decoder trusts what it is given.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::{
    DASH_MAX_MS, DELETE_FEEDBACK_MS, DELETE_MAX_MS, DOT_MAX_MS, LETTER_GAP_MS, WORD_GAP_MS,
};

/// Why a config was rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    ZeroThreshold { name: &'static str },

    #[error("closure bands must be ordered: dot_max ({dot}ms) < dash_max ({dash}ms) < delete_max ({delete}ms)")]
    ClosureBandsOutOfOrder { dot: u64, dash: u64, delete: u64 },

    #[error("letter_gap ({letter}ms) must be shorter than word_gap ({word}ms)")]
    GapsOutOfOrder { letter: u64, word: u64 },

    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Timing thresholds for one decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Longest closure that still counts as a dot
    pub dot_max_ms: u64,
    /// Longest closure that still counts as a dash
    pub dash_max_ms: u64,
    /// Longest closure that still counts as a delete
    pub delete_max_ms: u64,
    /// Silence needed to decode the pending letter
    pub letter_gap_ms: u64,
    /// Silence needed to insert a word separator
    pub word_gap_ms: u64,
    /// How long the delete confirmation is shown
    pub delete_feedback_ms: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            dot_max_ms: DOT_MAX_MS,
            dash_max_ms: DASH_MAX_MS,
            delete_max_ms: DELETE_MAX_MS,
            letter_gap_ms: LETTER_GAP_MS,
            word_gap_ms: WORD_GAP_MS,
            delete_feedback_ms: DELETE_FEEDBACK_MS,
        }
    }
}

impl DecoderConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: DecoderConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is positive and the bands are ordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("dot_max_ms", self.dot_max_ms),
            ("dash_max_ms", self.dash_max_ms),
            ("delete_max_ms", self.delete_max_ms),
            ("letter_gap_ms", self.letter_gap_ms),
            ("word_gap_ms", self.word_gap_ms),
            ("delete_feedback_ms", self.delete_feedback_ms),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroThreshold { name });
        }

        if !(self.dot_max_ms < self.dash_max_ms && self.dash_max_ms < self.delete_max_ms) {
            return Err(ConfigError::ClosureBandsOutOfOrder {
                dot: self.dot_max_ms,
                dash: self.dash_max_ms,
                delete: self.delete_max_ms,
            });
        }

        if self.letter_gap_ms >= self.word_gap_ms {
            return Err(ConfigError::GapsOutOfOrder {
                letter: self.letter_gap_ms,
                word: self.word_gap_ms,
            });
        }

        Ok(())
    }

    pub fn dot_max(&self) -> Duration {
        Duration::from_millis(self.dot_max_ms)
    }

    pub fn dash_max(&self) -> Duration {
        Duration::from_millis(self.dash_max_ms)
    }

    pub fn delete_max(&self) -> Duration {
        Duration::from_millis(self.delete_max_ms)
    }

    pub fn letter_gap(&self) -> Duration {
        Duration::from_millis(self.letter_gap_ms)
    }

    pub fn word_gap(&self) -> Duration {
        Duration::from_millis(self.word_gap_ms)
    }

    pub fn delete_feedback(&self) -> Duration {
        Duration::from_millis(self.delete_feedback_ms)
    }
}
