//! Eye state and per-session timing

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The two states of the decoder's edge detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EyeState {
    /// Eye open: gap evaluation runs every frame
    #[default]
    Open,
    /// Eye closed: a closure is being timed
    Closed,
}

impl EyeState {
    pub fn from_closed(is_closed: bool) -> Self {
        if is_closed {
            EyeState::Closed
        } else {
            EyeState::Open
        }
    }

    pub fn is_closed(&self) -> bool {
        *self == EyeState::Closed
    }

    /// Get emoji for state
    pub fn emoji(&self) -> &'static str {
        match self {
            EyeState::Open => "👁",
            EyeState::Closed => "➖",
        }
    }
}

impl std::fmt::Display for EyeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EyeState::Open => "OPEN",
            EyeState::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}

/// One completed closure, built on the closed→open edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureEvent {
    pub start_time: Duration,
    pub end_time: Duration,
}

impl ClosureEvent {
    /// Closure length, or `None` if the clock went backwards
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.checked_sub(self.start_time)
    }
}

/// Mutable timing record owned by the decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingState {
    pub eye: EyeState,
    /// When the current closure began (only meaningful while closed)
    pub closed_since: Duration,
    /// Last symbol, delete, letter flush or separator. `None` until the first frame.
    pub last_event_time: Option<Duration>,
}

impl TimingState {
    /// Silence since the last event, saturating at zero
    pub fn silence(&self, now: Duration) -> Duration {
        self.last_event_time
            .map(|t| now.saturating_sub(t))
            .unwrap_or_default()
    }
}
