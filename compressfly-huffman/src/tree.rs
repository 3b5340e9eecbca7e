//! Frequency analysis and Huffman tree construction.
//!
//! The tree is built with a binary min-heap keyed by `(frequency, sequence)`.
//! Leaves receive sequence numbers in byte-value order and every merged node
//! receives the next number, so equal frequencies always pop in insertion
//! order and the resulting codes are deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

/// Byte frequency distribution of one input buffer.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Frequency of `symbol`.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Symbols that occur at least once, with their frequencies.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of distinct symbols.
    pub fn distinct(&self) -> usize {
        self.symbols().count()
    }
}

#[derive(Debug)]
enum Node {
    Leaf(u8),
    Internal {
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
}

#[derive(Debug)]
struct HeapItem {
    frequency: u64,
    sequence: u64,
    node: Node,
}

impl HeapItem {
    fn key(&self) -> (u64, u64) {
        (self.frequency, self.sequence)
    }
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

fn build_tree(frequencies: &FrequencyTable) -> Option<Node> {
    let mut heap = BinaryHeap::new();
    let mut sequence = 0u64;

    for (symbol, frequency) in frequencies.symbols() {
        heap.push(Reverse(HeapItem {
            frequency,
            sequence,
            node: Node::Leaf(symbol),
        }));
        sequence += 1;
    }

    // A lone symbol still needs one edge so that it gets the code "0".
    if heap.len() == 1 {
        let Reverse(only) = heap.pop()?;
        heap.push(Reverse(HeapItem {
            frequency: only.frequency,
            sequence,
            node: Node::Internal {
                left: Box::new(only.node),
                right: None,
            },
        }));
        sequence += 1;
    }

    while heap.len() > 1 {
        let Reverse(first) = heap.pop()?;
        let Reverse(second) = heap.pop()?;
        heap.push(Reverse(HeapItem {
            frequency: first.frequency + second.frequency,
            sequence,
            node: Node::Internal {
                left: Box::new(first.node),
                right: Some(Box::new(second.node)),
            },
        }));
        sequence += 1;
    }

    heap.pop().map(|Reverse(root)| root.node)
}

/// Byte to bit-string code table and its inverse.
#[derive(Debug, Clone, Default)]
pub struct Codebook {
    codes: Vec<Option<String>>,
    reverse: BTreeMap<String, u8>,
}

impl Codebook {
    /// Build the codebook for the given frequency distribution.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut codebook = Self {
            codes: vec![None; 256],
            reverse: BTreeMap::new(),
        };

        let Some(root) = build_tree(frequencies) else {
            return codebook;
        };

        // Left edges append "0", right edges append "1".
        let mut stack = vec![(root, String::new())];
        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf(symbol) => {
                    codebook.reverse.insert(code.clone(), symbol);
                    codebook.codes[symbol as usize] = Some(code);
                }
                Node::Internal { left, right } => {
                    if let Some(right) = right {
                        stack.push((*right, format!("{code}1")));
                    }
                    stack.push((*left, format!("{code}0")));
                }
            }
        }

        codebook
    }

    /// Code assigned to `symbol`, if it occurred in the input.
    pub fn code(&self, symbol: u8) -> Option<&str> {
        self.codes[symbol as usize].as_deref()
    }

    /// The inverse mapping: bit-string code to byte.
    pub fn reverse(&self) -> &BTreeMap<String, u8> {
        &self.reverse
    }

    /// Number of coded symbols.
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    /// Whether no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}
