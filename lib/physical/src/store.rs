use rdf_streams_model::VisibilityBindingSet;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::Bound;

/// A key/value store that holds the state of a stage.
pub trait KeyValueStore: Debug + Send {
    /// Inserts `value` under `key`, replacing any previous value.
    fn put(&mut self, key: String, value: VisibilityBindingSet);

    fn get(&self, key: &str) -> Option<&VisibilityBindingSet>;

    /// Returns all entries whose key starts with `prefix`, ordered by key.
    fn prefix_scan<'store>(
        &'store self,
        prefix: &str,
    ) -> Box<dyn Iterator<Item = (&'store str, &'store VisibilityBindingSet)> + 'store>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [KeyValueStore] that keeps its entries in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, VisibilityBindingSet>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn put(&mut self, key: String, value: VisibilityBindingSet) {
        self.entries.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<&VisibilityBindingSet> {
        self.entries.get(key)
    }

    fn prefix_scan<'store>(
        &'store self,
        prefix: &str,
    ) -> Box<dyn Iterator<Item = (&'store str, &'store VisibilityBindingSet)> + 'store> {
        let prefix = prefix.to_owned();
        let range = self
            .entries
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded));
        Box::new(
            range
                .take_while(move |(key, _)| key.starts_with(&prefix))
                .map(|(key, value)| (key.as_str(), value)),
        )
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
