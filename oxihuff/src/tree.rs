//! Huffman code tree construction.
//!
//! The tree is built with the classic greedy merge: keep every node in a
//! min-priority queue keyed by weight, repeatedly pull the two lightest
//! nodes, join them under a new internal node, and push that back until a
//! single root remains.
//!
//! # Tie-break
//!
//! Equal weights are ordered by a creation rank. Leaves are ranked by
//! ascending symbol value (0..=255), internal nodes by creation order
//! starting at 256, so leaves win ties against internal nodes and older
//! internal nodes win against newer ones. The first node pulled becomes the
//! left (`0`) child. Only code lengths leave this module, and the container
//! carries them in canonical form, so decoders never depend on this rule.

use crate::code::CodeTable;
use crate::frequency::{ALPHABET_SIZE, FrequencyTable};
use oxihuff_core::BitString;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A node of the code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeTreeNode {
    /// A symbol and its frequency.
    Leaf {
        /// Byte value.
        symbol: u8,
        /// Occurrence count.
        weight: u64,
    },
    /// Two exclusively owned subtrees.
    Internal {
        /// Sum of the children's weights.
        weight: u64,
        /// Subtree reached by a `0` bit.
        left: Box<CodeTreeNode>,
        /// Subtree reached by a `1` bit.
        right: Box<CodeTreeNode>,
    },
}

impl CodeTreeNode {
    /// Weight of this node.
    pub fn weight(&self) -> u64 {
        match self {
            Self::Leaf { weight, .. } | Self::Internal { weight, .. } => *weight,
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// Queue entry ordered by `(weight, rank)`.
#[derive(Debug)]
struct QueueEntry {
    weight: u64,
    rank: u32,
    node: CodeTreeNode,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.rank).cmp(&(other.weight, other.rank))
    }
}

/// An optimal prefix-code tree for one frequency table.
///
/// A table with a single distinct symbol yields a tree whose root is that
/// symbol's leaf; the leaf is treated as sitting one level below the root so
/// the symbol still receives a 1-bit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: CodeTreeNode,
}

impl CodeTree {
    /// Build the tree for `table`. Returns `None` for an empty table.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut queue: BinaryHeap<Reverse<QueueEntry>> = table
            .iter()
            .map(|(symbol, weight)| {
                Reverse(QueueEntry {
                    weight,
                    rank: u32::from(symbol),
                    node: CodeTreeNode::Leaf { symbol, weight },
                })
            })
            .collect();

        let mut next_rank = ALPHABET_SIZE as u32;
        while queue.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (queue.pop(), queue.pop()) else {
                break;
            };

            let weight = left.weight.saturating_add(right.weight);
            queue.push(Reverse(QueueEntry {
                weight,
                rank: next_rank,
                node: CodeTreeNode::Internal {
                    weight,
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
            }));
            next_rank += 1;
        }

        queue.pop().map(|Reverse(entry)| Self { root: entry.node })
    }

    /// Root node.
    pub fn root(&self) -> &CodeTreeNode {
        &self.root
    }

    /// Total weight (input length).
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        fn count(node: &CodeTreeNode) -> usize {
            match node {
                CodeTreeNode::Leaf { .. } => 1,
                CodeTreeNode::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Number of internal nodes.
    pub fn internal_count(&self) -> usize {
        fn count(node: &CodeTreeNode) -> usize {
            match node {
                CodeTreeNode::Leaf { .. } => 0,
                CodeTreeNode::Internal { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// `(symbol, depth)` for every leaf, in depth-first order.
    ///
    /// Depths never exceed 255 since the tree has at most 256 leaves.
    pub fn code_lengths(&self) -> Vec<(u8, u8)> {
        let mut lengths = Vec::new();
        if let CodeTreeNode::Leaf { symbol, .. } = self.root {
            lengths.push((symbol, 1));
            return lengths;
        }

        let mut stack = vec![(&self.root, 0u8)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                CodeTreeNode::Leaf { symbol, .. } => lengths.push((*symbol, depth)),
                CodeTreeNode::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        lengths
    }

    /// Codes read straight off the tree paths: `0` for left, `1` for right.
    ///
    /// These are the tree's own codes, not the canonical ones the container
    /// carries; both assign every symbol the same length.
    pub fn path_codes(&self) -> CodeTable {
        fn walk(node: &CodeTreeNode, path: &mut BitString, table: &mut CodeTable) {
            match node {
                CodeTreeNode::Leaf { symbol, .. } => table.insert(*symbol, path.clone()),
                CodeTreeNode::Internal { left, right, .. } => {
                    path.push(false);
                    walk(left, path, table);
                    path.pop();
                    path.push(true);
                    walk(right, path, table);
                    path.pop();
                }
            }
        }

        let mut table = CodeTable::new();
        if let CodeTreeNode::Leaf { symbol, .. } = self.root {
            table.insert(symbol, BitString::zeros(1));
        } else {
            walk(&self.root, &mut BitString::new(), &mut table);
        }
        table
    }
}
