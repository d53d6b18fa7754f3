//! Morse table: letters and digits ⇄ dot-dash sequences
//!
//! Decode is the hot path and never fails: a miss yields UNKNOWN_CHAR.

use lazy_static::lazy_static;
use std::collections::HashMap;
use thiserror::Error;

use crate::types::Symbol;
use crate::UNKNOWN_CHAR;

/// International Morse, letters then digits
static CODES: [(char, &str); 36] = [
    ('A', ".-"), ('B', "-..."), ('C', "-.-."), ('D', "-.."), ('E', "."),
    ('F', "..-."), ('G', "--."), ('H', "...."), ('I', ".."), ('J', ".---"),
    ('K', "-.-"), ('L', ".-.."), ('M', "--"), ('N', "-."), ('O', "---"),
    ('P', ".--."), ('Q', "--.-"), ('R', ".-."), ('S', "..."), ('T', "-"),
    ('U', "..-"), ('V', "...-"), ('W', ".--"), ('X', "-..-"), ('Y', "-.--"),
    ('Z', "--.."),
    ('1', ".----"), ('2', "..---"), ('3', "...--"), ('4', "....-"), ('5', "....."),
    ('6', "-...."), ('7', "--..."), ('8', "---.."), ('9', "----."), ('0', "-----"),
];

lazy_static! {
    static ref TABLE: MorseTable = MorseTable::build();
}

/// Text that cannot be expressed in Morse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("no Morse code for {ch:?} at position {position}")]
    Unencodable { ch: char, position: usize },
}

/// Bidirectional lookup between characters and symbol sequences
#[derive(Debug)]
pub struct MorseTable {
    decode: HashMap<Vec<Symbol>, char>,
    encode: HashMap<char, Vec<Symbol>>,
}

impl MorseTable {
    fn build() -> Self {
        let mut decode = HashMap::with_capacity(CODES.len());
        let mut encode = HashMap::with_capacity(CODES.len());
        for &(ch, code) in CODES.iter() {
            let symbols: Vec<Symbol> = code.chars().filter_map(Symbol::from_char).collect();
            decode.insert(symbols.clone(), ch);
            encode.insert(ch, symbols);
        }
        Self { decode, encode }
    }

    /// The shared, immutable table
    pub fn global() -> &'static MorseTable {
        &TABLE
    }

    /// Resolve a symbol sequence; unknown sequences become UNKNOWN_CHAR
    pub fn decode(&self, symbols: &[Symbol]) -> char {
        self.decode.get(symbols).copied().unwrap_or(UNKNOWN_CHAR)
    }

    /// Symbols for a letter or digit (case-insensitive)
    pub fn encode(&self, ch: char) -> Option<&[Symbol]> {
        self.encode
            .get(&ch.to_ascii_uppercase())
            .map(|v| v.as_slice())
    }

    /// Every character the table knows
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        CODES.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.decode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decode.is_empty()
    }

    /// Render text as Morse: letters separated by spaces, words by " / "
    pub fn encode_text(&self, text: &str) -> Result<String, EncodeError> {
        let mut words: Vec<Vec<String>> = vec![Vec::new()];
        for (position, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                if words.last().is_some_and(|w| !w.is_empty()) {
                    words.push(Vec::new());
                }
                continue;
            }
            let symbols = self
                .encode(ch)
                .ok_or(EncodeError::Unencodable { ch, position })?;
            if let Some(word) = words.last_mut() {
                word.push(Symbol::sequence_to_string(symbols));
            }
        }
        Ok(words
            .iter()
            .filter(|w| !w.is_empty())
            .map(|w| w.join(" "))
            .collect::<Vec<_>>()
            .join(" / "))
    }
}
