//! Grouping of flat, ordered rows by key.
//!
//! Joined queries return one row per (category, item, step) combination.
//! Rebuilding the nested tree is a pure reshaping step: group by the parent
//! key, keeping groups in the order their key was first seen and rows in
//! their original order inside each group.

use std::hash::Hash;

use indexmap::IndexMap;

/// Group `rows` by `key`, preserving first-seen order of keys and the input
/// order of rows within each group.
pub fn group_ordered<T, K, F>(rows: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups.into_iter().collect()
}
