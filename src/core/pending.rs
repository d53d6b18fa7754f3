//! Pending symbol buffer: the letter currently being keyed

use crate::types::Symbol;

/// Ordered dots and dashes of one not-yet-decoded letter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSymbolBuffer {
    symbols: Vec<Symbol>,
}

impl PendingSymbolBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Hand back the buffered letter and leave the buffer empty
    pub fn take(&mut self) -> Vec<Symbol> {
        std::mem::take(&mut self.symbols)
    }
}

impl std::fmt::Display for PendingSymbolBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Symbol::sequence_to_string(&self.symbols))
    }
}
