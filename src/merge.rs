//! Per-zone merging of test items.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::item::TestItem;

/// Collects one zone's test items keyed by epoch.
///
/// The first item inserted for an epoch wins; later items with the same
/// epoch are discarded.
#[derive(Debug, Clone, Default)]
pub struct ItemMerger {
    items: BTreeMap<i64, TestItem>,
}

impl ItemMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` unless its epoch is already present. Returns whether
    /// the item was kept.
    pub fn insert(&mut self, item: TestItem) -> bool {
        match self.items.entry(item.epoch) {
            Entry::Vacant(entry) => {
                entry.insert(item);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The merged items in ascending epoch order.
    pub fn into_items(self) -> Vec<TestItem> {
        self.items.into_values().collect()
    }
}

impl Extend<TestItem> for ItemMerger {
    fn extend<T: IntoIterator<Item = TestItem>>(&mut self, iter: T) {
        for item in iter {
            self.insert(item);
        }
    }
}
