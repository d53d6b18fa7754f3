//! Blinkmorse: decode eye-blink closures into text using Morse timing
//!
//! Frame stream (timestamp, is_closed) → edge detection → SymbolClassifier
//! → PendingSymbolBuffer / TextBuffer → decoded text + feedback

pub mod core;
pub mod types;

// =============================================================================
// CLOSURE BANDS - how long the eye stayed shut (milliseconds)
// =============================================================================

/// Closures up to this long are dots
pub const DOT_MAX_MS: u64 = 250;

/// Closures up to this long (and above DOT_MAX) are dashes
pub const DASH_MAX_MS: u64 = 600;

/// Closures up to this long (and above DASH_MAX) delete the last character.
/// Anything longer is ignored as noise.
pub const DELETE_MAX_MS: u64 = 1200;

// =============================================================================
// SILENCE GAPS - eye open, no events (milliseconds)
// =============================================================================

/// Silence after the last symbol before the pending letter is decoded
pub const LETTER_GAP_MS: u64 = 500;

/// Silence with no pending letter before a word separator is inserted
pub const WORD_GAP_MS: u64 = 1200;

// =============================================================================
// FEEDBACK
// =============================================================================

/// How long the delete confirmation stays visible
pub const DELETE_FEEDBACK_MS: u64 = 1000;

/// Message shown after a delete
pub const DELETE_FEEDBACK_MESSAGE: &str = "DELETED!";

// =============================================================================
// TEXT
// =============================================================================

/// Character appended for a symbol sequence with no table entry
pub const UNKNOWN_CHAR: char = '?';

/// Word separator in the decoded text
pub const SEPARATOR: char = ' ';

// =============================================================================
// API
// =============================================================================

/// Live sessions one API server holds before refusing new ones
pub const MAX_SESSIONS: usize = 256;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
