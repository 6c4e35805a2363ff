//! Small generic helpers over slices and maps

use std::collections::HashMap;
use std::hash::Hash;

/// Returns true if `value` is present in `items`
pub fn contains<T: PartialEq>(items: &[T], value: &T) -> bool {
    items.iter().any(|item| item == value)
}

/// Returns the keys of `map` in ascending order
pub fn sorted_keys<K, V>(map: &HashMap<K, V>) -> Vec<K>
where
    K: Ord + Hash + Clone,
{
    let mut keys: Vec<K> = map.keys().cloned().collect();
    keys.sort();
    keys
}
