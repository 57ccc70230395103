//! Huffman tree construction over the nibble alphabet.
//!
//! The tree lives in a flat arena: leaves first (in symbol order), then
//! internal nodes in the order they were merged. Nodes refer to each other by
//! index, so building and dropping a tree is a single `Vec` allocation.
//!
//! # Merge order
//!
//! Pending nodes wait in a queue: leaves in symbol order, each merged node
//! appended at the tail. Every round runs one exchange pass over the queue
//! under [`merge_order`] (lower weight first, then higher tie-break key),
//! which leaves the next merges at the tail. The last node becomes the left
//! child and the second-last the right.
//!
//! A leaf's key is its symbol value and an internal node's key is the sum of
//! its children's keys, so a merged node can tie a leaf on both weight and
//! key. Such ties are settled by where the exchange pass leaves them, not by
//! any further comparison. Encoder and decoder must agree on this exactly.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ModelError;
use crate::model::{Snapshot, Symbol, ALPHABET_SIZE};

/// Leaf or internal node payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Symbol),
    Internal { left: usize, right: usize },
}

/// One arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    /// Tie-break key; carries no meaning beyond ordering merges.
    pub key: u32,
    pub parent: Option<usize>,
    pub kind: NodeKind,
}

impl Node {
    fn leaf(symbol: Symbol, weight: u64) -> Self {
        Self {
            weight,
            key: symbol.value() as u32,
            parent: None,
            kind: NodeKind::Leaf(symbol),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// Compare two nodes for merge priority; `Less` merges first.
///
/// Nodes with equal weight and key compare `Equal`.
pub fn merge_order(a: &Node, b: &Node) -> Ordering {
    a.weight.cmp(&b.weight).then_with(|| b.key.cmp(&a.key))
}

/// One exchange pass over the pending queue.
///
/// For every pair of positions `(i, j)` the entries swap when the node at `j`
/// merges strictly before the node at `i`. Afterwards merge priority rises
/// toward the tail; nodes that compare `Equal` end up wherever the pass
/// leaves them.
pub fn order_queue(nodes: &[Node], queue: &mut [usize]) {
    for i in 0..queue.len() {
        for j in 0..queue.len() {
            if merge_order(&nodes[queue[j]], &nodes[queue[i]]) == Ordering::Less {
                queue.swap(i, j);
            }
        }
    }
}

/// Take the next two nodes to merge off the pending queue.
///
/// Returns `(left, right)` arena indices, or `None` (queue untouched) with
/// fewer than two candidates.
pub fn select_two_smallest(nodes: &[Node], queue: &mut Vec<usize>) -> Option<(usize, usize)> {
    if queue.len() < 2 {
        return None;
    }
    order_queue(nodes, queue);
    let left = queue.pop()?;
    let right = queue.pop()?;
    Some((left, right))
}

/// A Huffman tree built from one frequency snapshot.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
    /// Arena index of each symbol's leaf
    leaves: [Option<usize>; ALPHABET_SIZE],
}

impl HuffmanTree {
    /// Build a tree with one leaf per nonzero weight.
    ///
    /// With a single nonzero weight the leaf itself is the root.
    ///
    /// # Errors
    /// `ModelError::EmptyAlphabet` if every weight is zero.
    pub fn build(snapshot: &Snapshot) -> Result<Self, ModelError> {
        let mut nodes = Vec::with_capacity(2 * ALPHABET_SIZE - 1);
        let mut leaves = [None; ALPHABET_SIZE];
        let mut pending = Vec::with_capacity(ALPHABET_SIZE);

        for symbol in Symbol::all() {
            let weight = snapshot[symbol.index()];
            if weight > 0 {
                leaves[symbol.index()] = Some(nodes.len());
                pending.push(nodes.len());
                nodes.push(Node::leaf(symbol, weight));
            }
        }

        while let Some((left, right)) = select_two_smallest(&nodes, &mut pending) {
            let merged = nodes.len();
            nodes.push(Node {
                weight: nodes[left].weight + nodes[right].weight,
                key: nodes[left].key + nodes[right].key,
                parent: None,
                kind: NodeKind::Internal { left, right },
            });
            nodes[left].parent = Some(merged);
            nodes[right].parent = Some(merged);
            pending.push(merged);
        }

        let root = pending.pop().ok_or(ModelError::EmptyAlphabet)?;
        Ok(Self { nodes, root, leaves })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Child of an internal node; `None` for leaves or bad indices.
    pub fn child(&self, index: usize, bit: bool) -> Option<usize> {
        match self.nodes.get(index)?.kind {
            NodeKind::Internal { left, right } => Some(if bit { right } else { left }),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Symbol stored at a leaf; `None` for internal nodes.
    pub fn symbol_at(&self, index: usize) -> Option<Symbol> {
        match self.nodes.get(index)?.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.iter().flatten().count()
    }

    /// Total weight at the root.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight
    }

    /// Number of edges from the root to `symbol`'s leaf.
    pub fn depth(&self, symbol: Symbol) -> Option<usize> {
        let mut index = self.leaves[symbol.index()]?;
        let mut depth = 0;
        while let Some(parent) = self.nodes[index].parent {
            index = parent;
            depth += 1;
        }
        Some(depth)
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, index: usize, is_right: bool, indent: &str) -> fmt::Result {
        let node = &self.nodes[index];
        if let NodeKind::Internal { right, .. } = node.kind {
            let next = format!("{indent}{}", if is_right { "        " } else { "|       " });
            self.fmt_node(f, right, true, &next)?;
        }

        write!(f, "{indent}+----- {}", node.weight)?;
        if let NodeKind::Leaf(symbol) = node.kind {
            write!(f, " [{:04b}]", symbol.value())?;
        }
        writeln!(f)?;

        if let NodeKind::Internal { left, .. } = node.kind {
            let next = format!("{indent}{}", if is_right { "|       " } else { "        " });
            self.fmt_node(f, left, false, &next)?;
        }
        Ok(())
    }
}

/// Sideways rendering: right subtrees above their parent, left below.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = &self.nodes[self.root];
        match root.kind {
            NodeKind::Leaf(symbol) => writeln!(f, "{} [{:04b}]", root.weight, symbol.value()),
            NodeKind::Internal { left, right } => {
                self.fmt_node(f, right, true, "")?;
                writeln!(f, "{}", root.weight)?;
                self.fmt_node(f, left, false, "")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(u8, u64)]) -> Snapshot {
        let mut snap = [0u64; ALPHABET_SIZE];
        for &(symbol, weight) in pairs {
            snap[symbol as usize] = weight;
        }
        snap
    }

    fn sym(v: u8) -> Symbol {
        Symbol::new(v).unwrap()
    }

    #[test]
    fn test_empty_snapshot_rejected() {
        let err = HuffmanTree::build(&[0; ALPHABET_SIZE]).unwrap_err();
        assert_eq!(err, ModelError::EmptyAlphabet);
    }

    #[test]
    fn test_single_leaf_is_root() {
        let tree = HuffmanTree::build(&snapshot(&[(7, 42)])).unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.symbol_at(tree.root()), Some(sym(7)));
        assert_eq!(tree.depth(sym(7)), Some(0));
        assert_eq!(tree.child(tree.root(), false), None);
    }

    #[test]
    fn test_equal_weights_prefer_higher_key() {
        // All weight 1: symbol 1 (higher key) merges first and goes left.
        let tree = HuffmanTree::build(&snapshot(&[(0, 1), (1, 1)])).unwrap();
        let root = tree.root();
        assert_eq!(tree.symbol_at(tree.child(root, false).unwrap()), Some(sym(1)));
        assert_eq!(tree.symbol_at(tree.child(root, true).unwrap()), Some(sym(0)));
    }

    #[test]
    fn test_lower_weight_goes_left() {
        let tree = HuffmanTree::build(&snapshot(&[(0, 1), (1, 5)])).unwrap();
        let root = tree.root();
        assert_eq!(tree.symbol_at(tree.child(root, false).unwrap()), Some(sym(0)));
        assert_eq!(tree.weight(), 6);
    }

    #[test]
    fn test_select_two_smallest_tie_break() {
        let nodes = vec![
            Node::leaf(sym(2), 3),
            Node::leaf(sym(5), 1),
            Node::leaf(sym(9), 1),
            Node::leaf(sym(4), 2),
        ];
        let mut queue = vec![0, 1, 2, 3];
        // Weight 1 twice: key 9 beats key 5
        assert_eq!(select_two_smallest(&nodes, &mut queue), Some((2, 1)));
        assert_eq!(queue, vec![0, 3]);

        let mut single = vec![0];
        assert_eq!(select_two_smallest(&nodes, &mut single), None);
        assert_eq!(single, vec![0]);
    }

    #[test]
    fn test_merge_order_ignores_node_kind() {
        let leaf = Node::leaf(sym(10), 2);
        let merged = Node {
            weight: 2,
            key: 10,
            parent: None,
            kind: NodeKind::Internal { left: 0, right: 1 },
        };
        assert_eq!(merge_order(&leaf, &merged), Ordering::Equal);
        assert_eq!(merge_order(&Node::leaf(sym(3), 1), &leaf), Ordering::Less);
        assert_eq!(merge_order(&Node::leaf(sym(11), 2), &leaf), Ordering::Less);
    }

    #[test]
    fn test_exact_tie_keeps_merged_node_at_tail() {
        // {4:1, 6:1, a:2}: merging 6 and 4 yields (w2, k10), tying leaf a
        let tree = HuffmanTree::build(&snapshot(&[(4, 1), (6, 1), (10, 2)])).unwrap();
        let root = tree.root();
        let left = tree.child(root, false).unwrap();
        assert_eq!(tree.symbol_at(left), None);
        assert_eq!(tree.symbol_at(tree.child(root, true).unwrap()), Some(sym(10)));
        assert_eq!(tree.symbol_at(tree.child(left, false).unwrap()), Some(sym(6)));
        assert_eq!(tree.symbol_at(tree.child(left, true).unwrap()), Some(sym(4)));
    }

    #[test]
    fn test_order_queue_moves_first_merge_to_tail() {
        let nodes: Vec<Node> = [(0, 4), (3, 1), (7, 1), (12, 9)]
            .iter()
            .map(|&(s, w)| Node::leaf(sym(s), w))
            .collect();
        let mut queue = vec![0, 1, 2, 3];
        order_queue(&nodes, &mut queue);
        assert_eq!(queue, vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_skewed_weights_give_deep_chain() {
        let tree = HuffmanTree::build(&snapshot(&[(0, 100), (1, 1), (2, 2), (3, 4)])).unwrap();
        assert_eq!(tree.depth(sym(0)), Some(1));
        assert_eq!(tree.depth(sym(3)), Some(2));
        assert_eq!(tree.depth(sym(1)), Some(3));
        assert_eq!(tree.depth(sym(2)), Some(3));
    }

    #[test]
    fn test_full_alphabet_node_count() {
        let tree = HuffmanTree::build(&[1; ALPHABET_SIZE]).unwrap();
        assert_eq!(tree.leaf_count(), 16);
        assert_eq!(tree.nodes().len(), 31);
        assert_eq!(tree.weight(), 16);
        assert!(Symbol::all().all(|s| tree.depth(s) == Some(4)));
    }

    #[test]
    fn test_display_renders_leaves() {
        let tree = HuffmanTree::build(&snapshot(&[(0, 1), (10, 2)])).unwrap();
        let text = tree.to_string();
        assert!(text.contains("[0000]"));
        assert!(text.contains("[1010]"));
        assert!(text.contains('3'));
    }
}
