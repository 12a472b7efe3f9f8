use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Keyed container that remembers the order in which keys were first seen.
/// Reports list accounts and statistics in that order.
#[derive(Debug, Clone)]
pub struct OrderedTable<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedTable<K, V> {
    fn default() -> Self {
        OrderedTable {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V> OrderedTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, creating it with `create` first if absent.
    pub fn upsert_with<Q>(&mut self, key: &Q, create: impl FnOnce() -> V) -> &mut V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.to_owned(), slot);
                self.entries.push((key.to_owned(), create()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
