//! Core modules for Blinkmorse

pub mod classifier;
pub mod pending;
pub mod gap;
pub mod morse_table;
pub mod text_buffer;
pub mod feedback;
pub mod decoder;
pub mod trace;
pub mod api;

pub use classifier::SymbolClassifier;
pub use pending::PendingSymbolBuffer;
pub use gap::{GapEvaluator, GapDecision};
pub use morse_table::{MorseTable, EncodeError};
pub use text_buffer::TextBuffer;
pub use feedback::FeedbackNotifier;
pub use decoder::MorseDecoder;
pub use trace::{Frame, FrameStream, FrameTrace, TraceError};
pub use api::{create_router, router, run_server, AppState};
