//! Transient feedback messages (e.g. "DELETED!")

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FeedbackState {
    message: String,
    expires_at: Duration,
}

/// Holds at most one message; a new `show` replaces the old one.
/// Expiry is checked on read, nothing tears it down.
#[derive(Debug, Clone, Default)]
pub struct FeedbackNotifier {
    state: Option<FeedbackState>,
}

impl FeedbackNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` from `now` for `duration`
    pub fn show(&mut self, message: impl Into<String>, duration: Duration, now: Duration) {
        self.state = Some(FeedbackState {
            message: message.into(),
            expires_at: now + duration,
        });
    }

    /// The message, while `now < expires_at`
    pub fn current(&self, now: Duration) -> Option<&str> {
        self.state
            .as_ref()
            .filter(|s| now < s.expires_at)
            .map(|s| s.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_visible_until_expiry() {
        let mut fb = FeedbackNotifier::new();
        assert_eq!(fb.current(ms(0)), None);

        fb.show("DELETED!", ms(1000), ms(500));
        assert_eq!(fb.current(ms(500)), Some("DELETED!"));
        assert_eq!(fb.current(ms(1499)), Some("DELETED!"));
        assert_eq!(fb.current(ms(1500)), None);
    }

    #[test]
    fn test_show_preempts() {
        let mut fb = FeedbackNotifier::new();
        fb.show("first", ms(1000), ms(0));
        fb.show("second", ms(200), ms(100));
        assert_eq!(fb.current(ms(150)), Some("second"));
        // The shorter replacement wins even though "first" would still be live
        assert_eq!(fb.current(ms(400)), None);
    }
}
