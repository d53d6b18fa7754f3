//! Core types for Blinkmorse

mod symbol;
mod config;
mod timing;
mod event;
mod output;

pub use symbol::{Symbol, Classification};
pub use config::{DecoderConfig, ConfigError};
pub use timing::{EyeState, ClosureEvent, TimingState};
pub use event::DecodeEvent;
pub use output::DecoderOutput;
