use std::collections::HashMap;

/// Maps position keys to packed upper bounds of their score
///
/// Every key is kept: there is no replacement scheme, so a lookup never
/// returns a bound that belongs to another position. A value of 0 means
/// "no entry", which is why callers store scores with an offset.
#[derive(Clone, Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, i32>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
    pub fn set(&mut self, key: u64, value: i32) {
        self.entries.insert(key, value);
    }
    pub fn get(&self, key: u64) -> i32 {
        self.entries.get(&key).copied().unwrap_or(0)
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
