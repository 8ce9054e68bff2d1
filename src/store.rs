//! A pair of keyed maps and the search, sort, insert and delete operations over them
#![warn(missing_docs)]

use std::{
    cmp::Ordering,
    collections::hash_map,
    fmt::{self, Display},
    mem,
};

use compact_str::CompactString;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    key::OrderedKey,
    map::{SortedMap, SortedMapBy},
    value::{ValueComparator, ValueProbe},
};

/// Hash-table mapping, iterated in an unspecified but deterministic order
pub type HashedMap = FxHashMap<OrderedKey, CompactString>;

/// Insertion-ordered mapping
pub type OrderedMap = IndexMap<OrderedKey, CompactString>;

//-----------------------------------------------------------------------------------------------//

/// The contents of one store field.
///
/// A field starts as whatever it was built from. Sorting by key replaces it with an
/// insertion-ordered map holding the keys in sorted order.
#[derive(Clone, Debug)]
pub enum KeyedMapping {
    /// Unordered hash table
    Hashed(HashedMap),
    /// Insertion-ordered map
    Ordered(OrderedMap),
}

impl KeyedMapping {
    /// Number of entries
    pub fn len(&self) -> usize {
        match self {
            KeyedMapping::Hashed(map) => map.len(),
            KeyedMapping::Ordered(map) => map.len(),
        }
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if iteration follows insertion order
    pub fn is_ordered(&self) -> bool {
        matches!(self, KeyedMapping::Ordered(_))
    }

    /// Look up a value by key
    pub fn get(&self, key: &OrderedKey) -> Option<&CompactString> {
        match self {
            KeyedMapping::Hashed(map) => map.get(key),
            KeyedMapping::Ordered(map) => map.get(key),
        }
    }

    /// Add or overwrite an entry, returning the previous value
    pub fn insert(&mut self, key: OrderedKey, value: CompactString) -> Option<CompactString> {
        match self {
            KeyedMapping::Hashed(map) => map.insert(key, value),
            KeyedMapping::Ordered(map) => map.insert(key, value),
        }
    }

    /// Remove an entry, returning its value. Remaining entries keep their relative order.
    pub fn remove(&mut self, key: &OrderedKey) -> Option<CompactString> {
        match self {
            KeyedMapping::Hashed(map) => map.remove(key),
            KeyedMapping::Ordered(map) => map.shift_remove(key),
        }
    }

    /// Iterate over the entries in the mapping's own order
    pub fn iter(&self) -> Iter<'_> {
        match self {
            KeyedMapping::Hashed(map) => Iter::Hashed(map.iter()),
            KeyedMapping::Ordered(map) => Iter::Ordered(map.iter()),
        }
    }

    fn into_pairs(self) -> Vec<(OrderedKey, CompactString)> {
        match self {
            KeyedMapping::Hashed(map) => map.into_iter().collect(),
            KeyedMapping::Ordered(map) => map.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeyedMapping {
    type Item = (&'a OrderedKey, &'a CompactString);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a `KeyedMapping`
pub enum Iter<'a> {
    /// Over a hash table
    Hashed(hash_map::Iter<'a, OrderedKey, CompactString>),
    /// Over an insertion-ordered map
    Ordered(indexmap::map::Iter<'a, OrderedKey, CompactString>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a OrderedKey, &'a CompactString);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Hashed(iter) => iter.next(),
            Iter::Ordered(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Hashed(iter) => iter.size_hint(),
            Iter::Ordered(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}

//-----------------------------------------------------------------------------------------------//

/// Names one of the two store fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The field built from the hash-table mapping
    Hashed,
    /// The field built from the insertion-ordered mapping
    Ordered,
}

impl Slot {
    /// Both slots, in the order the driver visits them
    pub const ALL: [Slot; 2] = [Slot::Hashed, Slot::Ordered];
}

impl Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::Hashed => "HashMap",
            Slot::Ordered => "LinkedHashMap",
        })
    }
}

//-----------------------------------------------------------------------------------------------//

/// Two independent keyed mappings and the operations the drills run over them.
///
/// Every operation takes the `Slot` it applies to. Mutating one slot never touches the other.
#[derive(Clone, Debug)]
pub struct KeyedMapStore {
    hashed: KeyedMapping,
    ordered: KeyedMapping,
}

impl KeyedMapStore {
    /// Build a store from a populated hash-table mapping and insertion-ordered mapping
    pub fn new(hashed: HashedMap, ordered: OrderedMap) -> KeyedMapStore {
        KeyedMapStore {
            hashed: KeyedMapping::Hashed(hashed),
            ordered: KeyedMapping::Ordered(ordered),
        }
    }

    /// Build a store whose two mappings both hold `pairs`
    pub fn from_pairs<I, V>(pairs: I) -> KeyedMapStore
    where
        I: IntoIterator<Item = (OrderedKey, V)>,
        V: Into<CompactString>,
    {
        let ordered: OrderedMap = pairs
            .into_iter()
            .map(|(key, value)| (key, value.into()))
            .collect();
        let hashed: HashedMap = ordered
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        KeyedMapStore::new(hashed, ordered)
    }

    /// Borrow the mapping in a slot
    pub fn mapping(&self, slot: Slot) -> &KeyedMapping {
        match slot {
            Slot::Hashed => &self.hashed,
            Slot::Ordered => &self.ordered,
        }
    }

    fn mapping_mut(&mut self, slot: Slot) -> &mut KeyedMapping {
        match slot {
            Slot::Hashed => &mut self.hashed,
            Slot::Ordered => &mut self.ordered,
        }
    }

    /// Look up a key. `None` means the key is not present.
    pub fn search_by_key(&self, slot: Slot, key: &OrderedKey) -> Option<&CompactString> {
        let found = self.mapping(slot).get(key);
        debug!(%slot, %key, found = found.is_some(), "search by key");
        found
    }

    /// Entries of a slot stably sorted by value.
    ///
    /// The base sequence is the mapping's iteration order, so entries sharing a value keep that
    /// order relative to each other.
    pub fn sort_by_value(&self, slot: Slot) -> Vec<(&OrderedKey, &CompactString)> {
        let mut entries: Vec<_> = self.mapping(slot).iter().collect();
        ValueComparator::sort(&mut entries);
        entries
    }

    /// Find a key holding `value` by binary search over the value-sorted entries.
    ///
    /// When several keys hold the value, the first of them in the stable sorted sequence is
    /// returned.
    pub fn search_by_value(&self, slot: Slot, value: &str) -> Option<&OrderedKey> {
        let entries = self.sort_by_value(slot);
        let found = ValueComparator::search(&entries, &ValueProbe::new(value))
            .map(|position| entries[position].0);
        debug!(%slot, value, found = found.is_some(), "search by value");
        found
    }

    /// Sort a slot by key.
    ///
    /// The slot's entries are taken out, ordered by `OrderedKey`'s order, and put back as an
    /// insertion-ordered map whose iteration order is the sorted key order. Values always come
    /// from the slot being sorted.
    pub fn sort_by_key(&mut self, slot: Slot) {
        let field = self.mapping_mut(slot);
        let snapshot = mem::replace(field, KeyedMapping::Ordered(OrderedMap::default()));

        let sorted: SortedMap<OrderedKey, CompactString> =
            snapshot.into_pairs().into_iter().collect();
        *field = KeyedMapping::Ordered(sorted.into_sorted_vec().into_iter().collect());

        debug!(%slot, len = field.len(), "sorted by key");
    }

    /// Sort a slot by key with a custom comparator.
    ///
    /// Keys the comparator considers equal fall back to `OrderedKey`'s own order, so every entry
    /// survives the sort.
    pub fn sort_by_key_with<F>(&mut self, slot: Slot, compare: F)
    where
        F: Fn(&OrderedKey, &OrderedKey) -> Ordering,
    {
        let field = self.mapping_mut(slot);
        let snapshot = mem::replace(field, KeyedMapping::Ordered(OrderedMap::default()));

        let pairs = snapshot.into_pairs();
        let compare = |a: &OrderedKey, b: &OrderedKey| compare(a, b).then_with(|| a.cmp(b));
        let mut sorted = SortedMapBy::with_capacity(pairs.len(), compare);
        for (key, value) in pairs {
            sorted.insert(key, value);
        }
        *field = KeyedMapping::Ordered(sorted.into_sorted_vec().into_iter().collect());

        debug!(%slot, len = field.len(), "sorted by key with custom order");
    }

    /// Add or overwrite an entry. Returns the value it replaced, if any.
    pub fn insert(
        &mut self,
        slot: Slot,
        key: OrderedKey,
        value: impl Into<CompactString>,
    ) -> Option<CompactString> {
        let value = value.into();
        debug!(%slot, %key, %value, "insert");
        self.mapping_mut(slot).insert(key, value)
    }

    /// Remove an entry by key. Returns the removed value, or `None` if the key was not present.
    pub fn remove_by_key(&mut self, slot: Slot, key: &OrderedKey) -> Option<CompactString> {
        let removed = self.mapping_mut(slot).remove(key);
        debug!(%slot, %key, removed = removed.is_some(), "remove by key");
        removed
    }

    /// Remove every entry whose value equals `value`. Returns how many were removed.
    pub fn remove_by_value(&mut self, slot: Slot, value: &str) -> usize {
        let mapping = self.mapping_mut(slot);

        let doomed: Vec<OrderedKey> = mapping
            .iter()
            .filter(|(_, candidate)| candidate.as_str() == value)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            mapping.remove(key);
        }

        debug!(%slot, value, removed = doomed.len(), "remove by value");
        doomed.len()
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn sample_store() -> KeyedMapStore {
    KeyedMapStore::from_pairs(crate::config::sample_pairs())
}

#[cfg(test)]
fn keys_of(store: &KeyedMapStore, slot: Slot) -> Vec<OrderedKey> {
    store.mapping(slot).iter().map(|(key, _)| key.clone()).collect()
}

#[test]
// Looking up, removing and looking up again the sample target key
fn test_store_search_and_remove_by_key() {
    let mut store = sample_store();
    let target = OrderedKey::new("Тайсон", "Каракас");

    for slot in Slot::ALL {
        assert_eq!(store.mapping(slot).len(), 10);
        assert_eq!(store.search_by_key(slot, &target).map(|v| v.as_str()), Some("Дмитро"));

        assert_eq!(store.remove_by_key(slot, &target).as_deref(), Some("Дмитро"));
        assert_eq!(store.search_by_key(slot, &target), None);
        assert_eq!(store.mapping(slot).len(), 9);

        assert_eq!(store.remove_by_key(slot, &target), None);
        assert_eq!(store.mapping(slot).len(), 9);
    }
}

#[test]
// Inserting a new key grows the mapping and the key can be found
fn test_store_insert() {
    let mut store = sample_store();
    let key = OrderedKey::new("Зорро", "Сан-Хосе");

    assert_eq!(store.insert(Slot::Hashed, key.clone(), "Богдан"), None);
    assert_eq!(store.mapping(Slot::Hashed).len(), 11);
    assert_eq!(store.search_by_key(Slot::Hashed, &key).map(|v| v.as_str()), Some("Богдан"));

    // The other slot is independent
    assert_eq!(store.mapping(Slot::Ordered).len(), 10);
    assert_eq!(store.search_by_key(Slot::Ordered, &key), None);

    let previous = store.insert(Slot::Hashed, key.clone(), "Ірина");
    assert_eq!(previous.as_deref(), Some("Богдан"));
    assert_eq!(store.mapping(Slot::Hashed).len(), 11);
}

#[test]
// Removing by value drops exactly the matching entries and keeps the others in order
fn test_store_remove_by_value() {
    let mut store = sample_store();

    assert_eq!(store.remove_by_value(Slot::Ordered, "Олександр"), 2);
    assert_eq!(store.mapping(Slot::Ordered).len(), 8);
    assert!(store
        .mapping(Slot::Ordered)
        .iter()
        .all(|(_, value)| value.as_str() != "Олександр"));

    let primaries: Vec<_> = keys_of(&store, Slot::Ordered)
        .iter()
        .filter_map(|key| key.primary().map(str::to_string))
        .collect();
    assert_eq!(
        primaries,
        vec!["Фантом", "Удав", "Тайсон", "Пітон", "Немо", "Мідас", "Лорд", "Кобра"]
    );

    assert_eq!(store.remove_by_value(Slot::Ordered, "Олександр"), 0);
    assert_eq!(store.remove_by_value(Slot::Hashed, "Олександр"), 2);
    assert_eq!(store.mapping(Slot::Hashed).len(), 8);
}

#[test]
// Searching by value finds a key holding the value, or nothing
fn test_store_search_by_value() {
    let store = sample_store();

    // In insertion order the first holder of the value is the first one inserted
    let found = store.search_by_value(Slot::Ordered, "Олександр");
    assert_eq!(found, Some(&OrderedKey::new("Яшма", "Сан-Паулу")));

    let found = store.search_by_value(Slot::Hashed, "Олександр");
    let found = found.expect("value is present");
    assert_eq!(
        store.search_by_key(Slot::Hashed, found).map(|v| v.as_str()),
        Some("Олександр")
    );

    assert_eq!(store.search_by_value(Slot::Hashed, "Богдан"), None);
    assert_eq!(store.search_by_value(Slot::Ordered, ""), None);

    let values: Vec<_> = store
        .sort_by_value(Slot::Ordered)
        .iter()
        .map(|(_, value)| value.to_string())
        .collect();
    let mut expected = values.clone();
    expected.sort();
    assert_eq!(values, expected);
}

#[test]
// Sorting by key orders descending, is idempotent and turns the hash slot into an ordered one
fn test_store_sort_by_key() {
    let mut hashed = HashedMap::default();
    hashed.insert(OrderedKey::new("A", "x"), "1".into());
    hashed.insert(OrderedKey::new("B", "x"), "2".into());
    hashed.insert(OrderedKey::from_parts(None, Some("x")), "3".into());
    hashed.insert(OrderedKey::new("B", "y"), "4".into());
    let mut store = KeyedMapStore::new(hashed, OrderedMap::default());

    assert!(!store.mapping(Slot::Hashed).is_ordered());
    store.sort_by_key(Slot::Hashed);
    assert!(store.mapping(Slot::Hashed).is_ordered());

    let sorted: Vec<_> = store
        .mapping(Slot::Hashed)
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect();
    assert_eq!(
        sorted,
        vec![
            (OrderedKey::new("B", "y"), "4".to_string()),
            (OrderedKey::new("B", "x"), "2".to_string()),
            (OrderedKey::new("A", "x"), "1".to_string()),
            (OrderedKey::from_parts(None, Some("x")), "3".to_string()),
        ]
    );

    let once = keys_of(&store, Slot::Hashed);
    store.sort_by_key(Slot::Hashed);
    assert_eq!(keys_of(&store, Slot::Hashed), once);

    // The sample data is already in descending order
    let mut store = sample_store();
    let before = keys_of(&store, Slot::Ordered);
    store.sort_by_key(Slot::Ordered);
    assert_eq!(keys_of(&store, Slot::Ordered), before);
}

#[test]
// Sorting keeps each value with its own key, taken from the slot being sorted
fn test_store_sort_by_key_values() {
    let mut store = sample_store();
    let key = OrderedKey::new("Тайсон", "Каракас");
    store.insert(Slot::Ordered, key.clone(), "Богдан");

    store.sort_by_key(Slot::Ordered);
    assert_eq!(store.search_by_key(Slot::Ordered, &key).map(|v| v.as_str()), Some("Богдан"));
    assert_eq!(store.search_by_key(Slot::Hashed, &key).map(|v| v.as_str()), Some("Дмитро"));
}

#[test]
// Reversing the comparator reverses the sequence without losing or gaining keys
fn test_store_sort_round_trip() {
    use rand::prelude::*;

    let mut rng = SmallRng::seed_from_u64(24680);
    let mut pairs = Vec::new();
    for i in 0..500 {
        let primary: u32 = rng.random_range(0..50);
        let key = OrderedKey::new(&format!("p{primary}"), &format!("s{i}"));
        pairs.push((key, format!("v{i}")));
    }

    let mut store = KeyedMapStore::from_pairs(pairs);
    store.sort_by_key(Slot::Hashed);
    let forward = keys_of(&store, Slot::Hashed);

    store.sort_by_key_with(Slot::Hashed, |a, b| b.cmp(a));
    let mut backward = keys_of(&store, Slot::Hashed);

    assert_eq!(forward.len(), 500);
    assert_eq!(backward.len(), 500);
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
// A comparator with ties reorders the slot without dropping any entry
fn test_store_sort_by_key_with_ties() {
    let first_letter = |key: &OrderedKey| key.primary().and_then(|label| label.chars().next());

    let mut store = sample_store();
    store.insert(Slot::Ordered, OrderedKey::new("Тигр", "Х"), "Богдан");
    store.sort_by_key_with(Slot::Ordered, |a, b| first_letter(a).cmp(&first_letter(b)));
    assert_eq!(store.mapping(Slot::Ordered).len(), 11);

    store.insert(Slot::Ordered, OrderedKey::new("Тигр", "Ц"), "Марія");
    store.sort_by_key_with(Slot::Ordered, |a, b| first_letter(a).cmp(&first_letter(b)));
    assert_eq!(store.mapping(Slot::Ordered).len(), 12);

    // Ties on the first letter keep the descending key order
    let primaries: Vec<_> = keys_of(&store, Slot::Ordered)
        .iter()
        .filter_map(|key| key.primary().map(str::to_string))
        .collect();
    assert_eq!(
        primaries,
        vec![
            "Кобра", "Лорд", "Мідас", "Немо", "Пітон", "Сіріус", "Тигр", "Тигр", "Тайсон", "Удав",
            "Фантом", "Яшма",
        ]
    );
    assert_eq!(
        store
            .search_by_key(Slot::Ordered, &OrderedKey::new("Тигр", "Х"))
            .map(|v| v.as_str()),
        Some("Богдан")
    );
}
