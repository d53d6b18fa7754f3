//! Gap evaluator: decide what a stretch of open-eye silence means
//!
//! Two branches, checked in order, at most one fires per frame:
//! 1. pending letter and silence > LETTER_GAP → flush the letter
//! 2. no pending letter, text not ending in a separator, silence > WORD_GAP
//!    → insert a separator
//!
//! A pending letter always has to be flushed before a word boundary can be
//! considered, so branch 2 is only reachable with an empty buffer.

use std::time::Duration;
use crate::core::{PendingSymbolBuffer, TextBuffer};
use crate::types::DecoderConfig;

/// What the silence calls for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapDecision {
    /// Resolve the pending letter and append it
    FlushLetter,
    /// Append a word separator
    InsertSeparator,
    /// Nothing to do yet
    Idle,
}

#[derive(Debug, Clone, Copy)]
pub struct GapEvaluator {
    letter_gap: Duration,
    word_gap: Duration,
}

impl Default for GapEvaluator {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl GapEvaluator {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            letter_gap: config.letter_gap(),
            word_gap: config.word_gap(),
        }
    }

    pub fn evaluate(
        &self,
        silence: Duration,
        pending: &PendingSymbolBuffer,
        text: &TextBuffer,
    ) -> GapDecision {
        if !pending.is_empty() {
            if silence > self.letter_gap {
                GapDecision::FlushLetter
            } else {
                GapDecision::Idle
            }
        } else if !text.is_empty() && !text.ends_with_separator() && silence > self.word_gap {
            GapDecision::InsertSeparator
        } else {
            GapDecision::Idle
        }
    }
}
