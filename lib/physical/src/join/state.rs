use crate::store::KeyValueStore;
use rdf_streams_logical::JoinKeys;
use rdf_streams_model::{Side, VisibilityBindingSet};

/// Separates the components of a join state key.
pub const KEY_SEPARATOR: char = '\u{1F}';

const FULLY_BOUND: &str = "b";
const PARTIALLY_BOUND: &str = "p";

/// Stores the binding sets that have arrived on both sides of a join.
///
/// A key has the form `<side> <b|p> <join values...> <all values...> <visibility>` where every
/// component is terminated by [KEY_SEPARATOR] and every value is the N-Triples form of the bound
/// term (or empty if the name is unbound). `b` marks binding sets in which all join variables are
/// bound. Hence, the partners of a fully bound binding set are either stored under a prefix that
/// consists of its join values or are partially bound themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinStateLayout {
    keys: JoinKeys,
}

impl JoinStateLayout {
    pub fn new(keys: JoinKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &JoinKeys {
        &self.keys
    }

    /// Returns the key under which `binding_set` is stored if it arrived on `side`.
    pub fn key(&self, side: Side, binding_set: &VisibilityBindingSet) -> String {
        let mut key = self.join_prefix(side, binding_set).unwrap_or_else(|| {
            let mut key = side_prefix(side);
            push_component(&mut key, PARTIALLY_BOUND);
            for name in self.keys.join_vars() {
                push_component(&mut key, &value_of(binding_set, name));
            }
            key
        });
        for name in self.keys.all_vars() {
            push_component(&mut key, &value_of(binding_set, name));
        }
        push_component(&mut key, binding_set.visibility());
        key
    }

    /// Stores `binding_set`, which arrived on `side`.
    ///
    /// Returns `false` without touching the store if an identical binding set with the same
    /// visibility has already arrived on `side`.
    pub fn insert(
        &self,
        store: &mut dyn KeyValueStore,
        side: Side,
        binding_set: &VisibilityBindingSet,
    ) -> bool {
        let key = self.key(side, binding_set);
        if store.get(&key).is_some() {
            return false;
        }
        store.put(key, binding_set.clone());
        true
    }

    /// Returns the binding sets of the opposite side that may be compatible with `binding_set`,
    /// which arrived on `side`.
    ///
    /// The candidates still need to be checked for compatibility.
    pub fn candidates(
        &self,
        store: &dyn KeyValueStore,
        side: Side,
        binding_set: &VisibilityBindingSet,
    ) -> Vec<VisibilityBindingSet> {
        let opposite = side.opposite();
        match self.join_prefix(opposite, binding_set) {
            Some(prefix) => {
                let mut partial = side_prefix(opposite);
                push_component(&mut partial, PARTIALLY_BOUND);
                scan(store, &prefix)
                    .chain(scan(store, &partial))
                    .collect()
            }
            None => scan(store, &side_prefix(opposite)).collect(),
        }
    }

    /// The key prefix of fully bound binding sets on `side` that share the join values of
    /// `binding_set`. Returns [None] if a join variable is unbound in `binding_set`.
    fn join_prefix(&self, side: Side, binding_set: &VisibilityBindingSet) -> Option<String> {
        let mut prefix = side_prefix(side);
        push_component(&mut prefix, FULLY_BOUND);
        for name in self.keys.join_vars() {
            let value = binding_set.bindings().get(name)?;
            push_component(&mut prefix, &value.to_string());
        }
        Some(prefix)
    }
}

fn scan<'store>(
    store: &'store dyn KeyValueStore,
    prefix: &str,
) -> impl Iterator<Item = VisibilityBindingSet> + 'store {
    store.prefix_scan(prefix).map(|(_, value)| value.clone())
}

fn side_prefix(side: Side) -> String {
    let mut prefix = String::new();
    push_component(&mut prefix, side.as_str());
    prefix
}

fn push_component(key: &mut String, component: &str) {
    key.push_str(component);
    key.push(KEY_SEPARATOR);
}

fn value_of(binding_set: &VisibilityBindingSet, name: &str) -> String {
    binding_set
        .bindings()
        .get(name)
        .map(ToString::to_string)
        .unwrap_or_default()
}
