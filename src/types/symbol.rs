//! Morse symbols and closure classifications

use serde::{Deserialize, Serialize};

/// One atomic unit of a Morse letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Render as `.` or `-`
    pub fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    /// Parse a single `.` or `-`
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }

    /// Parse a dot-dash string like `"..-"`. Any other character fails.
    pub fn parse_sequence(s: &str) -> Option<Vec<Symbol>> {
        s.chars().map(Symbol::from_char).collect()
    }

    /// Render a sequence as a dot-dash string
    pub fn sequence_to_string(symbols: &[Symbol]) -> String {
        symbols.iter().map(Symbol::as_char).collect()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Result of classifying one closure by duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Dot,
    Dash,
    /// Remove the last decoded character
    DeleteCommand,
    /// Too long (or impossible) to mean anything
    Ignore,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Classification::Dot => "DOT",
            Classification::Dash => "DASH",
            Classification::DeleteCommand => "DELETE",
            Classification::Ignore => "IGNORE",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence() {
        assert_eq!(
            Symbol::parse_sequence("..-"),
            Some(vec![Symbol::Dot, Symbol::Dot, Symbol::Dash])
        );
        assert_eq!(Symbol::parse_sequence(".x-"), None);
        assert_eq!(Symbol::parse_sequence(""), Some(vec![]));
    }

    #[test]
    fn test_sequence_to_string() {
        let seq = [Symbol::Dash, Symbol::Dot, Symbol::Dash, Symbol::Dot];
        assert_eq!(Symbol::sequence_to_string(&seq), "-.-.");
    }
}
