//! Phrase dictionary management.
//!
//! Phrases are numbered from 1 in the order they are first seen; index 0
//! stands for the empty phrase. Once the dictionary reaches its maximum
//! index it is frozen: no new phrases are added, but existing ones keep
//! matching. Encoder and decoder apply the same rule, so their numbering
//! never drifts apart.

use std::collections::HashMap;
use std::ops::Range;

use compressfly_core::error::{CompressFlyError, Result};

use crate::token::MAX_ENCODABLE_INDEX;

/// Default ceiling on dictionary indices.
pub const MAX_DICTIONARY_INDEX: u32 = MAX_ENCODABLE_INDEX;

pub(crate) fn validate_max_index(max_index: u32) -> Result<u32> {
    if max_index == 0 || max_index > MAX_DICTIONARY_INDEX {
        return Err(CompressFlyError::invalid_parameter(format!(
            "dictionary ceiling must be in 1..={MAX_DICTIONARY_INDEX}, got {max_index}"
        )));
    }
    Ok(max_index)
}

/// Encoder-side dictionary: `(prefix index, byte) -> index`.
#[derive(Debug)]
pub struct PhraseDictionary {
    phrases: HashMap<(u32, u8), u32>,
    next_index: u32,
    max_index: u32,
}

impl PhraseDictionary {
    /// Create an empty dictionary.
    pub fn new(max_index: u32) -> Result<Self> {
        Ok(Self {
            phrases: HashMap::new(),
            next_index: 1,
            max_index: validate_max_index(max_index)?,
        })
    }

    /// Index of the phrase `prefix + byte`, if registered.
    pub fn find(&self, prefix: u32, byte: u8) -> Option<u32> {
        self.phrases.get(&(prefix, byte)).copied()
    }

    /// Register `prefix + byte` under the next free index.
    ///
    /// Returns `None` once the dictionary is frozen.
    pub fn insert(&mut self, prefix: u32, byte: u8) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let index = self.next_index;
        self.phrases.insert((prefix, byte), index);
        self.next_index += 1;
        Some(index)
    }

    /// Whether the ceiling has been reached.
    pub fn is_full(&self) -> bool {
        self.next_index > self.max_index
    }

    /// Number of registered phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Whether no phrase is registered.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Decoder-side dictionary.
///
/// Every phrase is written to the output contiguously when it is first
/// decoded, so it is stored as the span it occupies there.
#[derive(Debug)]
pub struct PhraseTable {
    spans: Vec<Range<usize>>,
    max_index: u32,
}

impl PhraseTable {
    /// Create an empty table.
    pub fn new(max_index: u32) -> Result<Self> {
        Ok(Self {
            spans: Vec::new(),
            max_index: validate_max_index(max_index)?,
        })
    }

    /// Output span of the phrase registered under `index`.
    pub fn span(&self, index: u32) -> Option<Range<usize>> {
        let slot = (index as usize).checked_sub(1)?;
        self.spans.get(slot).cloned()
    }

    /// Register the next phrase unless the table is frozen.
    pub fn push(&mut self, span: Range<usize>) {
        if !self.is_full() {
            self.spans.push(span);
        }
    }

    /// Whether the ceiling has been reached.
    pub fn is_full(&self) -> bool {
        self.spans.len() as u64 >= u64::from(self.max_index)
    }

    /// Number of registered phrases.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether no phrase is registered.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
