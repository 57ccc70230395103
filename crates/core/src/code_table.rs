//! Codeword derivation from a Huffman tree.
//!
//! A walk from the root appends `0` on every left edge and `1` on every right
//! edge; the bits collected on reaching a leaf are that symbol's codeword.
//! The walk runs on an explicit stack.

use std::fmt;

use crate::model::{Symbol, ALPHABET_SIZE};
use crate::tree::{HuffmanTree, NodeKind};

/// A codeword of up to 32 bits, stored right-aligned (first bit is the most
/// significant of the `len` low bits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codeword {
    bits: u32,
    len: u8,
}

impl Codeword {
    /// The zero-length codeword of a single-leaf tree.
    pub const EMPTY: Codeword = Codeword { bits: 0, len: 0 };

    pub fn new(bits: u32, len: u8) -> Self {
        Self { bits, len }
    }

    /// Codeword with one more bit appended.
    pub fn push(self, bit: bool) -> Self {
        Self {
            bits: (self.bits << 1) | bit as u32,
            len: self.len + 1,
        }
    }

    pub fn bits(self) -> u32 {
        self.bits
    }

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Bits in transmission order.
    pub fn iter(self) -> impl Iterator<Item = bool> {
        (0..self.len).rev().map(move |shift| (self.bits >> shift) & 1 == 1)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol -> codeword mapping for the symbols present in one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Codeword>; ALPHABET_SIZE],
    weights: [u64; ALPHABET_SIZE],
}

impl CodeTable {
    /// Derive every leaf's codeword from `tree`.
    pub fn derive(tree: &HuffmanTree) -> Self {
        let mut codes = [None; ALPHABET_SIZE];
        let mut weights = [0u64; ALPHABET_SIZE];
        let mut stack = vec![(tree.root(), Codeword::EMPTY)];

        while let Some((index, prefix)) = stack.pop() {
            let Some(node) = tree.node(index) else {
                continue;
            };
            match node.kind {
                NodeKind::Leaf(symbol) => {
                    codes[symbol.index()] = Some(prefix);
                    weights[symbol.index()] = node.weight;
                }
                NodeKind::Internal { left, right } => {
                    stack.push((right, prefix.push(true)));
                    stack.push((left, prefix.push(false)));
                }
            }
        }

        Self { codes, weights }
    }

    /// Codeword for `symbol`, or `None` if it is not a leaf of the tree.
    pub fn get(&self, symbol: Symbol) -> Option<Codeword> {
        self.codes[symbol.index()]
    }

    /// Number of symbols with a codeword.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.codes.iter().flatten().map(|c| c.len()).max().unwrap_or(0)
    }
}

/// One line per coded symbol: `symbol [nibble] weight = code`.
impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in Symbol::all() {
            if let Some(code) = self.codes[symbol.index()] {
                writeln!(
                    f,
                    "{:2} [{:04b}] {} = {}",
                    symbol.value(),
                    symbol.value(),
                    self.weights[symbol.index()],
                    code
                )?;
            }
        }
        Ok(())
    }
}
