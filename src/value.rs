//! Ordering map entries by their values
#![warn(missing_docs)]

use std::cmp::Ordering;

//-----------------------------------------------------------------------------------------------//

/// Anything that exposes a value the `ValueComparator` can order
pub trait ValueView {
    /// The value, or `None` if it is absent
    fn value(&self) -> Option<&str>;
}

impl<K, V> ValueView for (K, V)
where
    V: AsRef<str>,
{
    #[inline]
    fn value(&self) -> Option<&str> {
        Some(self.1.as_ref())
    }
}

/// A value-only stand-in used to probe a value-sorted sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueProbe<'a> {
    value: Option<&'a str>,
}

impl<'a> ValueProbe<'a> {
    /// Probe for a present value
    pub fn new(value: &'a str) -> ValueProbe<'a> {
        ValueProbe { value: Some(value) }
    }

    /// Probe for an absent value
    pub fn absent() -> ValueProbe<'a> {
        ValueProbe { value: None }
    }
}

impl ValueView for ValueProbe<'_> {
    #[inline]
    fn value(&self) -> Option<&str> {
        self.value
    }
}

//-----------------------------------------------------------------------------------------------//

/// Orders entries by value alone, ignoring keys.
///
/// Absent values sort before present ones and two absent values are equal. Entries with equal
/// values and different keys compare equal, so this is not a total order over entries; sorting is
/// always stable to keep the relative order of such entries.
pub struct ValueComparator;

impl ValueComparator {
    /// Compare two optional values
    pub fn compare_values(a: Option<&str>, b: Option<&str>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }

    /// Compare two entries by value
    #[inline]
    pub fn compare_entries<A, B>(a: &A, b: &B) -> Ordering
    where
        A: ValueView + ?Sized,
        B: ValueView + ?Sized,
    {
        Self::compare_values(a.value(), b.value())
    }

    /// Stable sort by value
    pub fn sort<E: ValueView>(entries: &mut [E]) {
        entries.sort_by(|a, b| Self::compare_entries(a, b));
    }

    /// Binary search a value-sorted slice.
    ///
    /// Returns the position of the first entry whose value equals the probe, or `None` if the
    /// probe only has an insertion point. The slice must already be sorted with `sort`.
    pub fn search<E: ValueView>(sorted: &[E], probe: &ValueProbe<'_>) -> Option<usize> {
        debug_assert!(sorted
            .windows(2)
            .all(|pair| Self::compare_entries(&pair[0], &pair[1]) != Ordering::Greater));

        let at = sorted.partition_point(|entry| {
            Self::compare_entries(entry, probe) == Ordering::Less
        });
        (at < sorted.len() && Self::compare_entries(&sorted[at], probe) == Ordering::Equal)
            .then_some(at)
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Absent values come first
fn test_compare_values() {
    assert_eq!(ValueComparator::compare_values(None, None), Ordering::Equal);
    assert_eq!(ValueComparator::compare_values(None, Some("")), Ordering::Less);
    assert_eq!(ValueComparator::compare_values(Some("a"), None), Ordering::Greater);
    assert_eq!(ValueComparator::compare_values(Some("a"), Some("b")), Ordering::Less);

    let mut probes = [
        ValueProbe::new("b"),
        ValueProbe::absent(),
        ValueProbe::new("a"),
    ];
    ValueComparator::sort(&mut probes);
    assert_eq!(
        probes,
        [ValueProbe::absent(), ValueProbe::new("a"), ValueProbe::new("b")]
    );
}

#[test]
// Equal values keep their original order and the search lands on the first of them
fn test_sort_and_search() {
    let mut entries = vec![(1, "Наталія"), (2, "Олександр"), (3, "Андрій"), (4, "Олександр")];
    ValueComparator::sort(&mut entries);
    assert_eq!(
        entries,
        vec![(3, "Андрій"), (1, "Наталія"), (2, "Олександр"), (4, "Олександр")]
    );

    let at = ValueComparator::search(&entries, &ValueProbe::new("Олександр"));
    assert_eq!(at, Some(2));
    assert_eq!(ValueComparator::search(&entries, &ValueProbe::new("Богдан")), None);
    assert_eq!(ValueComparator::search(&entries, &ValueProbe::new("Я")), None);
    assert_eq!(ValueComparator::search(&entries, &ValueProbe::absent()), None);
}
