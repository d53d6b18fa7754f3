//! Decoded message buffer

use crate::SEPARATOR;

/// The decoded text. Append-only except for explicit delete-last.
/// Never ends in two separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded character. Separators go through `append_separator`.
    pub fn append(&mut self, ch: char) {
        if ch == SEPARATOR {
            self.append_separator();
        } else {
            self.text.push(ch);
        }
    }

    /// Append a word separator. No-op when empty or already ending in one.
    /// Returns whether a separator was added.
    pub fn append_separator(&mut self) -> bool {
        if self.text.is_empty() || self.ends_with_separator() {
            return false;
        }
        self.text.push(SEPARATOR);
        true
    }

    /// Remove and return the last character, if any
    pub fn delete_last(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn ends_with_separator(&self) -> bool {
        self.text.ends_with(SEPARATOR)
    }

    pub fn current(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_delete() {
        let mut buf = TextBuffer::new();
        buf.append('H');
        buf.append('I');
        assert_eq!(buf.current(), "HI");
        assert_eq!(buf.delete_last(), Some('I'));
        assert_eq!(buf.current(), "H");
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut buf = TextBuffer::new();
        assert_eq!(buf.delete_last(), None);
        assert_eq!(buf.delete_last(), None);
        assert!(buf.is_empty());
        assert_eq!(buf.current(), "");
    }

    #[test]
    fn test_separator_rules() {
        let mut buf = TextBuffer::new();
        assert!(!buf.append_separator(), "no separator on empty buffer");

        buf.append('A');
        assert!(buf.append_separator());
        assert!(!buf.append_separator(), "no double separator");
        assert_eq!(buf.current(), "A ");

        // Raw space goes through the same rule
        buf.append(' ');
        assert_eq!(buf.current(), "A ");
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_delete_separator_then_append() {
        let mut buf = TextBuffer::new();
        buf.append('A');
        buf.append_separator();
        assert_eq!(buf.delete_last(), Some(' '));
        assert!(buf.append_separator());
        assert_eq!(buf.current(), "A ");
    }
}
