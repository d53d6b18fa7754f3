//! What a single frame did to the decoder

use serde::{Deserialize, Serialize};
use crate::types::Symbol;

/// One observable change produced by `MorseDecoder::process_frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DecodeEvent {
    /// Open→closed edge, closure timing started
    ClosureStarted,
    /// Dot or dash added to the pending letter
    SymbolAppended(Symbol),
    /// Delete closure; carries the removed character (None if text was empty)
    Deleted(Option<char>),
    /// Closure too long (or clock went backwards), dropped
    Ignored,
    /// Pending letter resolved and appended
    LetterDecoded(char),
    /// Word separator appended
    SeparatorInserted,
}

impl DecodeEvent {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::ClosureStarted => "CLOSURE_STARTED",
            Self::SymbolAppended(_) => "SYMBOL_APPENDED",
            Self::Deleted(_) => "DELETED",
            Self::Ignored => "IGNORED",
            Self::LetterDecoded(_) => "LETTER_DECODED",
            Self::SeparatorInserted => "SEPARATOR_INSERTED",
        }
    }

    /// Does this event change the decoded text?
    pub fn changes_text(&self) -> bool {
        matches!(
            self,
            Self::Deleted(Some(_)) | Self::LetterDecoded(_) | Self::SeparatorInserted
        )
    }
}

impl std::fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SymbolAppended(s) => write!(f, "{} '{}'", self.code(), s),
            Self::Deleted(Some(c)) => write!(f, "{} '{}'", self.code(), c),
            Self::Deleted(None) => write!(f, "{} (empty)", self.code()),
            Self::LetterDecoded(c) => write!(f, "{} '{}'", self.code(), c),
            _ => write!(f, "{}", self.code()),
        }
    }
}
