//! Frame traces: recorded (t_ms, closed) streams in text form
//!
//! One frame per line: `<t_ms> <state>` where state is 1/0, closed/open or c/o.
//! `#` starts a comment. Timestamps must never decrease.
//!
//! `FrameStream` reads the same format from a live host, line by line.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::core::{EncodeError, MorseDecoder, MorseTable};
use crate::types::{ConfigError, DecodeEvent, DecoderConfig, Symbol};

lazy_static! {
    static ref RE_FRAME: Regex = Regex::new(
        r"(?i)^(\d+)\s+(1|0|closed|open|c|o)$"
    ).unwrap();
}

/// Why a trace could not be read
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: expected `<t_ms> <open|closed>`, got {text:?}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: timestamp {t_ms}ms is earlier than previous {previous}ms")]
    Decreasing { line: usize, t_ms: u64, previous: u64 },

    #[error("cannot read trace {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One observation from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Monotonic stream time (milliseconds)
    pub t_ms: u64,
    /// Eye classified as closed in this frame
    pub closed: bool,
}

impl Frame {
    pub fn new(t_ms: u64, closed: bool) -> Self {
        Self { t_ms, closed }
    }

    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.t_ms)
    }

    /// Parse a single trace line. `Ok(None)` for blank and comment lines.
    pub fn parse_line(raw: &str, line: usize) -> Result<Option<Frame>, TraceError> {
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            return Ok(None);
        }
        let malformed = || TraceError::Malformed { line, text: text.to_string() };

        let caps = RE_FRAME.captures(text).ok_or_else(malformed)?;
        let t_ms: u64 = caps[1].parse().map_err(|_| malformed())?;
        let closed = matches!(
            caps[2].to_ascii_lowercase().as_str(),
            "1" | "closed" | "c"
        );
        Ok(Some(Frame { t_ms, closed }))
    }
}

/// An ordered list of frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameTrace {
    frames: Vec<Frame>,
}

impl FrameTrace {
    /// Parse trace text
    pub fn parse(input: &str) -> Result<Self, TraceError> {
        let mut frames: Vec<Frame> = Vec::new();
        for (idx, raw) in input.lines().enumerate() {
            let line = idx + 1;
            let Some(frame) = Frame::parse_line(raw, line)? else {
                continue;
            };
            if let Some(prev) = frames.last() {
                if frame.t_ms < prev.t_ms {
                    return Err(TraceError::Decreasing {
                        line,
                        t_ms: frame.t_ms,
                        previous: prev.t_ms,
                    });
                }
            }
            frames.push(frame);
        }
        Ok(Self { frames })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Build a trace that keys `text` with closures in the middle of the
    /// dot and dash bands. Frames are only emitted where something changes:
    /// edges, and one open frame just past each letter and word gap.
    pub fn synthesize(text: &str, config: &DecoderConfig) -> Result<Self, TraceError> {
        // Band midpoints only exist for ordered bands
        config.validate()?;
        let table = MorseTable::global();
        // Validate the whole text up front so errors carry the real position
        table.encode_text(text)?;

        let dot_len = config.dot_max_ms / 2;
        let dash_len = config.dot_max_ms + (config.dash_max_ms - config.dot_max_ms + 1) / 2;
        let symbol_gap = config.letter_gap_ms / 2;

        let mut frames = vec![Frame::new(0, false)];
        let mut t = 0u64;

        for (w, word) in text.split_whitespace().enumerate() {
            if w > 0 {
                t += config.word_gap_ms + 1;
                frames.push(Frame::new(t, false));
            }
            for ch in word.chars() {
                let symbols = table.encode(ch).unwrap_or(&[]);
                for symbol in symbols {
                    t += symbol_gap;
                    frames.push(Frame::new(t, true));
                    t += match symbol {
                        Symbol::Dot => dot_len,
                        Symbol::Dash => dash_len,
                    };
                    frames.push(Frame::new(t, false));
                }
                t += config.letter_gap_ms + 1;
                frames.push(Frame::new(t, false));
            }
        }

        Ok(Self { frames })
    }

    /// Text the synthesized trace for `text` decodes to
    pub fn normalize(text: &str) -> String {
        text.split_whitespace()
            .map(|w| w.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Feed every frame to `decoder`, returning all events in order
    pub fn replay(&self, decoder: &mut MorseDecoder) -> Vec<DecodeEvent> {
        self.frames
            .iter()
            .flat_map(|f| decoder.process_frame(f.timestamp(), f.closed))
            .collect()
    }

    /// Render back to trace text
    pub fn render(&self) -> String {
        let mut out = String::from("# t_ms closed\n");
        for f in &self.frames {
            out.push_str(&format!("{} {}\n", f.t_ms, if f.closed { 1 } else { 0 }));
        }
        out
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time span covered by the trace
    pub fn duration(&self) -> Duration {
        match (self.frames.first(), self.frames.last()) {
            (Some(a), Some(b)) => Duration::from_millis(b.t_ms - a.t_ms),
            _ => Duration::ZERO,
        }
    }
}

impl From<Vec<Frame>> for FrameTrace {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

/// Frames read one line at a time from a live host.
///
/// Lines that are not valid UTF-8 or not a frame are logged and skipped.
/// EOF or a `quit` line ends the stream. Any other read error is yielded
/// once and should end the session.
pub struct FrameStream<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
}

impl<R: BufRead> FrameStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: Vec::new(), line: 0 }
    }

    /// Number of lines consumed so far
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for FrameStream<R> {
    type Item = io::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            }

            let raw = match std::str::from_utf8(&self.buf) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("line {}: not valid UTF-8 ({}), skipped", self.line, e);
                    continue;
                }
            };
            if raw.trim().eq_ignore_ascii_case("quit") {
                return None;
            }
            match Frame::parse_line(raw, self.line) {
                Ok(Some(frame)) => return Some(Ok(frame)),
                Ok(None) => {}
                Err(e) => warn!("{}, skipped", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_states_and_comments() {
        let input = "# header\n0 open\n\n100 1   # blink\n200 O\n300 c\n400 0\n";
        let trace = FrameTrace::parse(input).unwrap();
        assert_eq!(
            trace.frames(),
            &[
                Frame::new(0, false),
                Frame::new(100, true),
                Frame::new(200, false),
                Frame::new(300, true),
                Frame::new(400, false),
            ]
        );
    }

    #[test]
    fn test_malformed_line_reports_number() {
        let err = FrameTrace::parse("0 0\n10 maybe\n").unwrap_err();
        match err {
            TraceError::Malformed { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "10 maybe");
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_decreasing_timestamp_rejected() {
        let err = FrameTrace::parse("0 0\n500 1\n400 0\n").unwrap_err();
        assert!(matches!(err, TraceError::Decreasing { line: 3, t_ms: 400, previous: 500 }));
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        assert_eq!(FrameTrace::parse("5 0\n5 1\n").unwrap().len(), 2);
    }

    #[test]
    fn test_render_parses_back() {
        let trace = FrameTrace::from(vec![Frame::new(0, false), Frame::new(120, true)]);
        assert_eq!(FrameTrace::parse(&trace.render()).unwrap(), trace);
    }

    #[test]
    fn test_synthesize_decodes_back() {
        let config = DecoderConfig::default();
        let trace = FrameTrace::synthesize("sos  help 73", &config).unwrap();
        let mut decoder = MorseDecoder::new(config);
        trace.replay(&mut decoder);
        assert_eq!(decoder.decoded_text(), "SOS HELP 73");
        assert!(decoder.pending_symbols().is_empty());
    }

    #[test]
    fn test_synthesize_with_tight_bands() {
        let config = DecoderConfig {
            dot_max_ms: 10,
            dash_max_ms: 11,
            delete_max_ms: 12,
            letter_gap_ms: 1,
            word_gap_ms: 2,
            delete_feedback_ms: 1,
        };
        let trace = FrameTrace::synthesize("ab c", &config).unwrap();
        let mut decoder = MorseDecoder::new(config);
        trace.replay(&mut decoder);
        assert_eq!(decoder.decoded_text(), "AB C");
    }

    #[test]
    fn test_synthesize_rejects_unencodable() {
        let err = FrameTrace::synthesize("hi!", &DecoderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            TraceError::Encode(EncodeError::Unencodable { ch: '!', position: 2 })
        ));
    }

    #[test]
    fn test_synthesize_rejects_unordered_bands() {
        let config = DecoderConfig { dot_max_ms: 700, ..Default::default() };
        let err = FrameTrace::synthesize("e", &config).unwrap_err();
        assert!(matches!(
            err,
            TraceError::Config(ConfigError::ClosureBandsOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_synthesize_rejects_zero_threshold() {
        let config = DecoderConfig { letter_gap_ms: 0, ..Default::default() };
        let err = FrameTrace::synthesize("e", &config).unwrap_err();
        assert!(matches!(err, TraceError::Config(ConfigError::ZeroThreshold { .. })));
    }

    /// Reader that hands out its bytes and then fails
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = io::Read::read(&mut self.data, buf)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "host went away"));
            }
            Ok(n)
        }
    }

    #[test]
    fn test_stream_skips_invalid_utf8_and_junk() {
        let input: &[u8] = b"0 0\n100 1\n\xff\xfe\nnot a frame\n# comment\n200 0\n";
        let mut stream = FrameStream::new(input);
        let frames: Vec<Frame> = stream.by_ref().map(|f| f.unwrap()).collect();
        assert_eq!(
            frames,
            vec![Frame::new(0, false), Frame::new(100, true), Frame::new(200, false)]
        );
        assert_eq!(stream.line(), 6);
    }

    #[test]
    fn test_stream_stops_at_quit() {
        let input: &[u8] = b"0 0\n10 1\n  QUIT \n20 0\n";
        let frames: Vec<Frame> = FrameStream::new(input).map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_stream_handles_crlf_and_missing_newline() {
        let input: &[u8] = b"0 0\r\n10 closed";
        let frames: Vec<Frame> = FrameStream::new(input).map(|f| f.unwrap()).collect();
        assert_eq!(frames, vec![Frame::new(0, false), Frame::new(10, true)]);
    }

    #[test]
    fn test_stream_yields_read_errors() {
        let reader = io::BufReader::new(FailingReader {
            data: io::Cursor::new(b"0 0\n".to_vec()),
        });
        let mut stream = FrameStream::new(reader);
        assert_eq!(stream.next().unwrap().unwrap(), Frame::new(0, false));
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(FrameTrace::normalize("  sos \t help "), "SOS HELP");
    }
}
