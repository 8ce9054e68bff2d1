//! The composite key stored in the keyed maps
#![warn(missing_docs)]

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use compact_str::CompactString;

//-----------------------------------------------------------------------------------------------//

/// Ordering, equality and hashing derived from a single definition.
///
/// Implementors provide `compare` and `hash_code`; `Ord`, `Eq` and `Hash` are then written in
/// terms of these two so the three relations cannot disagree. The contract is:
///
/// - `compare` is a total order,
/// - `compare(a, b) == Equal` exactly when `a == b`,
/// - `a == b` implies `hash_code(a) == hash_code(b)`.
pub trait CoherentKey {
    /// Total order over keys
    fn compare(&self, other: &Self) -> Ordering;

    /// Deterministic hash, stable across runs and platforms
    fn hash_code(&self) -> i32;
}

// Multiplier used to mix field hashes
const HASH_MULTIPLIER: i32 = 31;

// Hash of an absent label
const ABSENT_HASH: i32 = 0;

/// Polynomial string hash over UTF-16 code units, with wrapping arithmetic.
pub fn label_hash(label: &str) -> i32 {
    label.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(i32::from(unit))
    })
}

// Descending order with absent values last
fn compare_descending(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => b.cmp(a),
    }
}

//-----------------------------------------------------------------------------------------------//

/// A key made of two optional labels.
///
/// Keys sort by the primary label in descending order, then by the secondary label in descending
/// order. An absent label sorts after every present one. Keys are immutable once built.
#[derive(Clone, Debug)]
pub struct OrderedKey {
    primary: Option<CompactString>,
    secondary: Option<CompactString>,
}

impl OrderedKey {
    /// Build a key from both labels
    pub fn new(primary: &str, secondary: &str) -> OrderedKey {
        OrderedKey::from_parts(Some(primary), Some(secondary))
    }

    /// Build a key with only a primary label
    pub fn primary_only(primary: &str) -> OrderedKey {
        OrderedKey::from_parts(Some(primary), None)
    }

    /// Build a key from optional labels
    pub fn from_parts(primary: Option<&str>, secondary: Option<&str>) -> OrderedKey {
        OrderedKey {
            primary: primary.map(CompactString::new),
            secondary: secondary.map(CompactString::new),
        }
    }

    /// The primary label
    #[inline]
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// The secondary label
    #[inline]
    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }
}

impl CoherentKey for OrderedKey {
    fn compare(&self, other: &Self) -> Ordering {
        compare_descending(self.primary(), other.primary())
            .then_with(|| compare_descending(self.secondary(), other.secondary()))
    }

    fn hash_code(&self) -> i32 {
        let primary = self.primary().map_or(ABSENT_HASH, label_hash);
        let secondary = self.secondary().map_or(ABSENT_HASH, label_hash);
        primary
            .wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(secondary)
    }
}

impl PartialEq for OrderedKey {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for OrderedKey {}

impl PartialOrd for OrderedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for OrderedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl Display for OrderedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderedKey{{primary='{}'", self.primary().unwrap_or("null"))?;
        if let Some(secondary) = self.secondary() {
            write!(f, ", secondary='{secondary}'")?;
        }
        write!(f, ", hash={}}}", self.hash_code())
    }
}

/// Parses `primary/secondary`. An empty side is an absent label, and text without a slash is a
/// primary label alone.
impl FromStr for OrderedKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn label(part: &str) -> Option<&str> {
            let part = part.trim();
            (!part.is_empty()).then_some(part)
        }

        Ok(match s.split_once('/') {
            Some((primary, secondary)) => OrderedKey::from_parts(label(primary), label(secondary)),
            None => OrderedKey::from_parts(label(s), None),
        })
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Primary labels sort in descending order, absent last
fn test_key_order_0() {
    let b = OrderedKey::new("B", "x");
    let a = OrderedKey::new("A", "x");
    let none = OrderedKey::from_parts(None, Some("x"));

    assert!(b < a);
    assert!(a < none);
    assert!(b < none);

    let mut keys = vec![none.clone(), a.clone(), b.clone()];
    keys.sort();
    assert_eq!(keys, vec![b, a, none]);
}

#[test]
// Secondary labels break ties, also descending with absent last
fn test_key_order_1() {
    let z = OrderedKey::new("Тайсон", "Я");
    let a = OrderedKey::new("Тайсон", "А");
    let bare = OrderedKey::primary_only("Тайсон");

    assert_eq!(z.cmp(&a), Ordering::Less);
    assert_eq!(a.cmp(&bare), Ordering::Less);
    assert_eq!(
        OrderedKey::from_parts(None, None).cmp(&OrderedKey::from_parts(None, None)),
        Ordering::Equal
    );
}

#[test]
// The hash mixes the labels in a fixed order and matches the polynomial string hash
fn test_key_hash() {
    assert_eq!(label_hash(""), 0);
    assert_eq!(label_hash("a"), 97);
    assert_eq!(label_hash("ab"), 97 * 31 + 98);

    let key = OrderedKey::new("a", "b");
    assert_eq!(key.hash_code(), 97 * 31 + 98);
    assert_ne!(key.hash_code(), OrderedKey::new("b", "a").hash_code());
    assert_eq!(OrderedKey::from_parts(None, None).hash_code(), 0);
    assert_eq!(OrderedKey::primary_only("a").hash_code(), 97 * 31);
}

#[test]
// Display shows both labels and the hash, and parsing accepts the flag syntax
fn test_key_text() {
    let key = OrderedKey::new("a", "b");
    assert_eq!(key.to_string(), "OrderedKey{primary='a', secondary='b', hash=3105}");
    assert_eq!(
        OrderedKey::primary_only("a").to_string(),
        "OrderedKey{primary='a', hash=3007}"
    );

    assert_eq!("Тайсон/Каракас".parse(), Ok(OrderedKey::new("Тайсон", "Каракас")));
    assert_eq!("Тайсон".parse(), Ok(OrderedKey::primary_only("Тайсон")));
    assert_eq!("/Каракас".parse(), Ok(OrderedKey::from_parts(None, Some("Каракас"))));
}

#[test]
// Parsed labels are trimmed and borrow nothing from the input
fn test_key_parse() {
    let key: OrderedKey = {
        let text = String::from("  Зорро / Сан-Хосе ");
        text.parse().unwrap()
    };
    assert_eq!(key, OrderedKey::new("Зорро", "Сан-Хосе"));

    assert_eq!(" Кобра / ".parse(), Ok(OrderedKey::primary_only("Кобра")));
    assert_eq!("/".parse(), Ok(OrderedKey::from_parts(None, None)));
    assert_eq!("".parse(), Ok(OrderedKey::from_parts(None, None)));
}

#[cfg(test)]
mod properties {
    use std::{cmp::Ordering, hash::BuildHasher};

    use proptest::prelude::*;

    use super::{CoherentKey, OrderedKey};

    fn arb_label() -> impl Strategy<Value = Option<String>> {
        proptest::option::of(prop_oneof![
            Just("Тайсон".to_string()),
            Just("Кобра".to_string()),
            "[a-cА-В]{0,3}",
        ])
    }

    fn arb_key() -> impl Strategy<Value = OrderedKey> {
        (arb_label(), arb_label()).prop_map(|(primary, secondary)| {
            OrderedKey::from_parts(primary.as_deref(), secondary.as_deref())
        })
    }

    proptest! {
        #[test]
        fn prop_compare_matches_equality(a in arb_key(), b in arb_key()) {
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
            prop_assert_eq!(a == b, b == a);
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        }

        #[test]
        fn prop_equal_keys_hash_equal(a in arb_key(), b in arb_key()) {
            if a == b {
                prop_assert_eq!(a.hash_code(), b.hash_code());
                let state = rustc_hash::FxBuildHasher;
                prop_assert_eq!(state.hash_one(&a), state.hash_one(&b));
            }
        }

        #[test]
        fn prop_reflexive(a in arb_key()) {
            prop_assert_eq!(&a, &a.clone());
            prop_assert_eq!(a.cmp(&a), Ordering::Equal);
        }

        // Every pair of a sorted run is ordered, not only neighbours
        #[test]
        fn prop_transitive(mut keys in proptest::collection::vec(arb_key(), 0..16)) {
            keys.sort();
            for (i, a) in keys.iter().enumerate() {
                for b in &keys[i + 1..] {
                    prop_assert_ne!(a.cmp(b), Ordering::Greater);
                }
            }
        }
    }
}
