//! Nibble symbols, alphabet presence sets, and the adaptive frequency model.
//!
//! Every byte is coded as two symbols: its high nibble, then its low nibble.
//! The encoder and decoder each own a `FrequencyModel` seeded from the same
//! `PresenceSet` and bumped after every coded symbol, which keeps the two
//! sides in lockstep.

use std::fmt;

use crate::error::ModelError;

/// Number of distinct symbols in the alphabet.
pub const ALPHABET_SIZE: usize = 16;

/// A 4-bit symbol (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Create a symbol, rejecting values that do not fit in a nibble.
    pub fn new(value: u8) -> Result<Self, ModelError> {
        if (value as usize) < ALPHABET_SIZE {
            Ok(Self(value))
        } else {
            Err(ModelError::SymbolOutOfRange(value))
        }
    }

    /// Split a byte into its (high, low) nibbles.
    pub fn split_byte(byte: u8) -> (Self, Self) {
        (Self(byte >> 4), Self(byte & 0x0F))
    }

    /// Join a (high, low) nibble pair back into a byte.
    pub fn join(high: Self, low: Self) -> u8 {
        (high.0 << 4) | low.0
    }

    /// All sixteen symbols in ascending order.
    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..ALPHABET_SIZE as u8).map(Symbol)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// The set of symbols that occur at least once in the input.
///
/// Bit `i` of the internal mask is symbol `i`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceSet(u16);

impl PresenceSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Set with every symbol present.
    pub fn full() -> Self {
        Self(u16::MAX)
    }

    /// Build from a bitmap in wire order (symbol 0 is the most significant bit).
    pub fn from_bitmap(bitmap: u16) -> Self {
        Self(bitmap.reverse_bits())
    }

    /// Bitmap in wire order (symbol 0 is the most significant bit).
    pub fn bitmap(self) -> u16 {
        self.0.reverse_bits()
    }

    /// Mark a symbol present; returns true if it was newly added.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let mask = 1u16 << symbol.index();
        let added = self.0 & mask == 0;
        self.0 |= mask;
        added
    }

    pub fn contains(self, symbol: Symbol) -> bool {
        self.0 & (1u16 << symbol.index()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self.0 == u16::MAX
    }

    /// Present symbols in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Symbol> {
        Symbol::all().filter(move |&s| self.contains(s))
    }

    /// The only present symbol, if exactly one is present.
    pub fn sole_symbol(self) -> Option<Symbol> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }
}

/// Per-symbol weights handed to the tree builder.
pub type Snapshot = [u64; ALPHABET_SIZE];

/// Adaptive per-symbol occurrence counts.
///
/// Present symbols start at weight 1 (not their true count) and absent
/// symbols stay at 0 forever, so they never become tree leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyModel {
    weights: Snapshot,
    presence: PresenceSet,
}

impl FrequencyModel {
    /// Seed weight 1 for every present symbol.
    pub fn from_presence(presence: PresenceSet) -> Self {
        let mut weights = [0u64; ALPHABET_SIZE];
        for symbol in presence.iter() {
            weights[symbol.index()] = 1;
        }
        Self { weights, presence }
    }

    /// Record one more occurrence of `symbol`.
    ///
    /// # Errors
    /// `ModelError::AbsentSymbol` if the symbol was not present at seeding.
    pub fn increment(&mut self, symbol: Symbol) -> Result<(), ModelError> {
        if !self.presence.contains(symbol) {
            return Err(ModelError::AbsentSymbol(symbol.value()));
        }
        self.weights[symbol.index()] += 1;
        Ok(())
    }

    pub fn weight(&self, symbol: Symbol) -> u64 {
        self.weights[symbol.index()]
    }

    pub fn snapshot(&self) -> Snapshot {
        self.weights
    }

    pub fn presence(&self) -> PresenceSet {
        self.presence
    }
}
