//! Ordered maps backed by a splay tree
#![warn(missing_docs)]

use std::{cmp::Ordering, mem};

use crate::util::{Tree, NIL};

//-----------------------------------------------------------------------------------------------//

/// A map between keys and values kept in ascending key order, implemented using a splay tree.
///
/// Keys and values are stored as pairs in a single vector and do not move as the tree reshapes
/// around them. Each insertion splays its key to the root.
#[derive(Clone)]
pub struct SortedMap<K, V>
where
    K: Ord,
{
    tree: Tree,
    key_value: Vec<(K, V)>,
}

impl<K, V> SortedMap<K, V>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> SortedMap<K, V> {
        SortedMap::with_capacity(0)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> SortedMap<K, V> {
        SortedMap {
            tree: Tree::with_capacity(capacity),
            key_value: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of key/value pairs in the map
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any key/value pairs in the map
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert a key/value pair, returning the previous value if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let slot = self.tree.insert(|x| key.cmp(&self.key_value[x].0));
        self.tree.promote(slot);
        store_at(&mut self.key_value, slot, key, value)
    }

    /// Consume the map, returning its pairs in ascending key order
    pub fn into_sorted_vec(self) -> Vec<(K, V)> {
        drain_in_order(&self.tree, self.key_value)
    }
}

impl<K, V> FromIterator<(K, V)> for SortedMap<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

//-----------------------------------------------------------------------------------------------//

/// A map between keys and values kept in the order given by a custom comparator, implemented
/// using a splay tree.
///
/// Keys the comparator reports as equal share one entry.
#[derive(Clone)]
pub struct SortedMapBy<K, V, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    tree: Tree,
    key_value: Vec<(K, V)>,
    compare: F,
}

impl<K, V, F> SortedMapBy<K, V, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> SortedMapBy<K, V, F> {
        SortedMapBy::with_capacity(0, compare)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> SortedMapBy<K, V, F> {
        SortedMapBy {
            tree: Tree::with_capacity(capacity),
            key_value: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of key/value pairs in the map
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any key/value pairs in the map
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert a key/value pair, returning the previous value if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let compare = &self.compare;
        let slot = self.tree.insert(|x| compare(&key, &self.key_value[x].0));
        self.tree.promote(slot);
        store_at(&mut self.key_value, slot, key, value)
    }

    /// Consume the map, returning its pairs in comparator order
    pub fn into_sorted_vec(self) -> Vec<(K, V)> {
        drain_in_order(&self.tree, self.key_value)
    }
}

//-----------------------------------------------------------------------------------------------//

// Put a pair at the slot the tree handed out. A slot past the end is new, any other slot already
// holds an equal key whose value is replaced.
fn store_at<K, V>(key_value: &mut Vec<(K, V)>, slot: usize, key: K, value: V) -> Option<V> {
    if slot == key_value.len() {
        key_value.push((key, value));
        None
    } else {
        Some(mem::replace(&mut key_value[slot].1, value))
    }
}

// Move the pairs out of `key_value` in tree order
fn drain_in_order<K, V>(tree: &Tree, key_value: Vec<(K, V)>) -> Vec<(K, V)> {
    let mut order = Vec::with_capacity(tree.count());
    let mut slot = tree.first();
    while slot != NIL {
        order.push(slot);
        slot = tree.next(slot);
    }

    let mut pairs: Vec<Option<(K, V)>> = key_value.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|slot| pairs[slot].take())
        .collect()
}

//-----------------------------------------------------------------------------------------------//

#[test]
// A very simple test of inserting into a map
fn test_sorted_map_0() {
    let mut map = SortedMap::new();

    map.insert(5, "Five".to_string());
    map.insert(1, "One".to_string());
    map.insert(9, "Nine".to_string());

    assert_eq!(map.len(), 3);
    assert_eq!(
        map.into_sorted_vec(),
        vec![
            (1, "One".to_string()),
            (5, "Five".to_string()),
            (9, "Nine".to_string())
        ]
    );
}

#[test]
// Overwriting returns the old value and keeps one entry per key
fn test_sorted_map_1() {
    let mut map = SortedMap::new();
    assert!(map.is_empty());

    assert_eq!(map.insert("b", 1), None);
    assert_eq!(map.insert("a", 2), None);
    assert_eq!(map.insert("b", 3), Some(1));
    assert_eq!(map.insert("c", 4), None);
    assert_eq!(map.len(), 3);

    assert_eq!(map.into_sorted_vec(), vec![("a", 2), ("b", 3), ("c", 4)]);
}

#[test]
// A custom comparator reverses the order
fn test_sorted_map_by_0() {
    let mut map = SortedMapBy::new(|a: &i32, b: &i32| b.cmp(a));
    for key in [3, 7, 1, 9] {
        map.insert(key, key * 10);
    }

    assert_eq!(map.len(), 4);
    assert_eq!(map.into_sorted_vec(), vec![(9, 90), (7, 70), (3, 30), (1, 10)]);
}

#[test]
// Keys the comparator calls equal share an entry, the last value wins
fn test_sorted_map_by_1() {
    let mut map = SortedMapBy::new(|a: &i32, b: &i32| (a / 10).cmp(&(b / 10)));

    assert_eq!(map.insert(12, "twelve"), None);
    assert_eq!(map.insert(31, "thirty-one"), None);
    assert_eq!(map.insert(17, "seventeen"), Some("twelve"));
    assert!(!map.is_empty());

    assert_eq!(map.into_sorted_vec(), vec![(12, "seventeen"), (31, "thirty-one")]);
}

#[test]
// A stress test with inserting and overwriting
fn test_sorted_map_2() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut map = SortedMap::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        map.insert(key, key.to_string());
    }

    assert_eq!(map.len(), COUNT);

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        assert_eq!(map.insert(key, key.to_string()), Some(key.to_string()));
    }

    let sorted = map.into_sorted_vec();
    assert_eq!(sorted.len(), COUNT);
    assert!(sorted.windows(2).all(|pair| pair[0].0 < pair[1].0));
    assert!(sorted.iter().all(|(key, value)| key.to_string() == *value));
}
