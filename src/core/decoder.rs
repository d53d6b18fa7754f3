//! Morse decoder: per-frame state machine over (timestamp, is_closed)
//!
//! State transitions:
//! - OPEN → CLOSED: record closure start
//! - CLOSED → OPEN: classify closure (dot / dash / delete / ignore)
//! - OPEN (every frame, including the reopening one): evaluate silence gap

use std::time::Duration;
use tracing::{debug, info};

use crate::core::{
    FeedbackNotifier, GapDecision, GapEvaluator, MorseTable, PendingSymbolBuffer,
    SymbolClassifier, TextBuffer,
};
use crate::types::{
    Classification, ClosureEvent, DecodeEvent, DecoderConfig, DecoderOutput, EyeState, Symbol,
    TimingState,
};
use crate::DELETE_FEEDBACK_MESSAGE;

/// Decoder context for one eye stream
#[derive(Debug, Clone)]
pub struct MorseDecoder {
    config: DecoderConfig,
    classifier: SymbolClassifier,
    gap: GapEvaluator,
    timing: TimingState,
    pending: PendingSymbolBuffer,
    text: TextBuffer,
    feedback: FeedbackNotifier,
    /// Timestamp of the most recent frame
    last_frame: Duration,
    /// Number of frames processed
    frame_count: u64,
}

impl Default for MorseDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl MorseDecoder {
    /// Create a decoder: eye open, empty buffers.
    /// `config` is expected to have passed `DecoderConfig::validate`.
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            classifier: SymbolClassifier::new(&config),
            gap: GapEvaluator::new(&config),
            timing: TimingState::default(),
            pending: PendingSymbolBuffer::new(),
            text: TextBuffer::new(),
            feedback: FeedbackNotifier::new(),
            last_frame: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Feed one frame. Returns what changed, in order.
    pub fn process_frame(&mut self, now: Duration, is_closed: bool) -> Vec<DecodeEvent> {
        let mut events = Vec::new();
        self.frame_count += 1;
        self.last_frame = now;

        // Silence is measured from the first frame we ever saw
        if self.timing.last_event_time.is_none() {
            self.timing.last_event_time = Some(now);
        }

        match (self.timing.eye, EyeState::from_closed(is_closed)) {
            (EyeState::Open, EyeState::Closed) => {
                self.timing.eye = EyeState::Closed;
                self.timing.closed_since = now;
                debug!("eye closed at {:.3}s", now.as_secs_f64());
                events.push(DecodeEvent::ClosureStarted);
            }
            (EyeState::Closed, EyeState::Open) => {
                self.timing.eye = EyeState::Open;
                let closure = ClosureEvent {
                    start_time: self.timing.closed_since,
                    end_time: now,
                };
                events.push(self.apply_closure(&closure, now));
            }
            _ => {}
        }

        if !self.timing.eye.is_closed() {
            if let Some(event) = self.apply_gap(now) {
                events.push(event);
            }
        }

        events
    }

    fn apply_closure(&mut self, closure: &ClosureEvent, now: Duration) -> DecodeEvent {
        let classification = self.classifier.classify_closure(closure);
        debug!("closure {:?} → {}", closure.duration(), classification);

        match classification {
            Classification::Dot => self.append_symbol(Symbol::Dot, now),
            Classification::Dash => self.append_symbol(Symbol::Dash, now),
            Classification::DeleteCommand => {
                let removed = self.text.delete_last();
                if let Some(ch) = removed {
                    self.feedback
                        .show(DELETE_FEEDBACK_MESSAGE, self.config.delete_feedback(), now);
                    info!("deleted {:?}, text now {:?}", ch, self.text.current());
                }
                self.timing.last_event_time = Some(now);
                DecodeEvent::Deleted(removed)
            }
            Classification::Ignore => {
                // Noise, but the time spent closed is not silence
                self.timing.last_event_time = Some(now);
                DecodeEvent::Ignored
            }
        }
    }

    fn append_symbol(&mut self, symbol: Symbol, now: Duration) -> DecodeEvent {
        self.pending.push(symbol);
        self.timing.last_event_time = Some(now);
        DecodeEvent::SymbolAppended(symbol)
    }

    fn apply_gap(&mut self, now: Duration) -> Option<DecodeEvent> {
        let silence = self.timing.silence(now);
        match self.gap.evaluate(silence, &self.pending, &self.text) {
            GapDecision::FlushLetter => {
                let symbols = self.pending.take();
                let ch = MorseTable::global().decode(&symbols);
                self.text.append(ch);
                self.timing.last_event_time = Some(now);
                info!(
                    "decoded {} → {:?}, text now {:?}",
                    Symbol::sequence_to_string(&symbols),
                    ch,
                    self.text.current()
                );
                Some(DecodeEvent::LetterDecoded(ch))
            }
            GapDecision::InsertSeparator => {
                self.text.append_separator();
                self.timing.last_event_time = Some(now);
                info!("word separator, text now {:?}", self.text.current());
                Some(DecodeEvent::SeparatorInserted)
            }
            GapDecision::Idle => None,
        }
    }

    /// Symbols of the letter in progress
    pub fn pending_symbols(&self) -> &[Symbol] {
        self.pending.symbols()
    }

    /// Decoded message so far
    pub fn decoded_text(&self) -> &str {
        self.text.current()
    }

    /// Feedback message, if still live at `now`
    pub fn feedback(&self, now: Duration) -> Option<&str> {
        self.feedback.current(now)
    }

    pub fn eye(&self) -> EyeState {
        self.timing.eye
    }

    pub fn is_closed(&self) -> bool {
        self.timing.eye.is_closed()
    }

    pub fn timing(&self) -> &TimingState {
        &self.timing
    }

    /// Timestamp of the most recent frame
    pub fn last_frame(&self) -> Duration {
        self.last_frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Snapshot at `now`, tagged with the last of `events`
    pub fn output(&self, now: Duration, events: &[DecodeEvent]) -> DecoderOutput {
        DecoderOutput {
            timestamp: chrono::Utc::now(),
            t_ms: u64::try_from(now.as_millis()).unwrap_or(u64::MAX),
            eye: self.timing.eye,
            pending: self.pending.to_string(),
            text: self.text.current().to_string(),
            feedback: self.feedback(now).map(str::to_string),
            last_event: events.last().map(|e| e.code().to_string()),
        }
    }

    /// Snapshot at the last frame time
    pub fn current_output(&self) -> DecoderOutput {
        self.output(self.last_frame, &[])
    }

    /// Back to a fresh session with the same config
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

// =============================================================================
// TESTS
// =============================================================================
