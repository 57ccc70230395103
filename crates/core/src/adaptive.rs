//! The adaptive model shared by the encoder and decoder.
//!
//! `AdaptiveCode` bundles the frequency model with the tree and code table
//! derived from it. After every coded symbol, `update` bumps that symbol's
//! weight and rebuilds both from scratch; nothing is patched incrementally.

use tracing::trace;

use crate::code_table::{CodeTable, Codeword};
use crate::error::{ModelError, Result};
use crate::model::{FrequencyModel, PresenceSet, Symbol};
use crate::tree::HuffmanTree;

#[derive(Debug, Clone)]
pub struct AdaptiveCode {
    model: FrequencyModel,
    tree: HuffmanTree,
    table: CodeTable,
    rebuilds: u64,
}

impl AdaptiveCode {
    /// Seed weight 1 per present symbol and build the initial tree/table.
    ///
    /// # Errors
    /// `ModelError::EmptyAlphabet` if `presence` is empty.
    pub fn new(presence: PresenceSet) -> Result<Self> {
        let model = FrequencyModel::from_presence(presence);
        let tree = HuffmanTree::build(&model.snapshot())?;
        let table = CodeTable::derive(&tree);
        trace!(present = presence.len(), "initial code table\n{table}");
        Ok(Self {
            model,
            tree,
            table,
            rebuilds: 1,
        })
    }

    /// Current codeword for `symbol`.
    pub fn codeword(&self, symbol: Symbol) -> Result<Codeword> {
        self.table
            .get(symbol)
            .ok_or_else(|| ModelError::AbsentSymbol(symbol.value()).into())
    }

    /// Count one occurrence of `symbol` and rebuild the tree and table.
    pub fn update(&mut self, symbol: Symbol) -> Result<()> {
        self.model.increment(symbol)?;
        self.tree = HuffmanTree::build(&self.model.snapshot())?;
        self.table = CodeTable::derive(&self.tree);
        self.rebuilds += 1;
        trace!(symbol = %symbol, rebuilds = self.rebuilds, "rebuilt tree\n{}{}", self.tree, self.table);
        Ok(())
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    /// Trees built so far, including the initial one.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn presence(symbols: &[u8]) -> PresenceSet {
        let mut set = PresenceSet::new();
        for &s in symbols {
            set.insert(Symbol::new(s).unwrap());
        }
        set
    }

    #[test]
    fn test_empty_presence_rejected() {
        let err = AdaptiveCode::new(PresenceSet::new()).unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::EmptyAlphabet)));
    }

    #[test]
    fn test_frequent_symbol_gets_shorter_code() {
        let mut code = AdaptiveCode::new(presence(&[0, 1, 2, 3])).unwrap();
        let zero = Symbol::new(0).unwrap();
        assert_eq!(code.codeword(zero).unwrap().len(), 2);

        for _ in 0..10 {
            code.update(zero).unwrap();
        }
        assert_eq!(code.codeword(zero).unwrap().len(), 1);
        assert_eq!(code.model().weight(zero), 11);
        assert_eq!(code.rebuilds(), 11);
    }

    #[test]
    fn test_absent_symbol_has_no_codeword() {
        let mut code = AdaptiveCode::new(presence(&[1, 2])).unwrap();
        let absent = Symbol::new(3).unwrap();
        assert!(code.codeword(absent).is_err());
        assert!(code.update(absent).is_err());
    }

    #[test]
    fn test_two_instances_stay_in_lockstep() {
        let set = presence(&[0, 5, 10, 15]);
        let mut a = AdaptiveCode::new(set).unwrap();
        let mut b = AdaptiveCode::new(set).unwrap();
        for v in [5u8, 5, 0, 15, 10, 10, 10, 5] {
            let s = Symbol::new(v).unwrap();
            a.update(s).unwrap();
            b.update(s).unwrap();
            assert_eq!(a.table(), b.table());
        }
    }
}
