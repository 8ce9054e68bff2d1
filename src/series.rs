//! Search, extremes and sorting over time values held in different collection shapes
#![warn(missing_docs)]

use std::{cmp::Reverse, collections::BinaryHeap};

use chrono::NaiveTime;
use indexmap::IndexSet;

/// Smallest and largest of a sequence, or `None` if it is empty
pub fn min_max<I>(values: I) -> Option<(NaiveTime, NaiveTime)>
where
    I: IntoIterator<Item = NaiveTime>,
{
    values.into_iter().fold(None, |bounds, value| match bounds {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

//-----------------------------------------------------------------------------------------------//

/// A fixed array of time values.
///
/// Searching scans linearly until the array has been sorted, and uses binary search after.
#[derive(Clone, Debug, Default)]
pub struct TimeArray {
    values: Vec<NaiveTime>,
    sorted: bool,
}

impl TimeArray {
    /// Wrap values in their current order
    pub fn new(values: Vec<NaiveTime>) -> TimeArray {
        TimeArray {
            values,
            sorted: false,
        }
    }

    /// The values in their current order
    pub fn as_slice(&self) -> &[NaiveTime] {
        &self.values
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if `sort` has been applied
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Sort ascending
    pub fn sort(&mut self) {
        self.values.sort_unstable();
        self.sorted = true;
    }

    /// Position of `target`. After sorting, the first of several equal values is reported.
    pub fn find(&self, target: NaiveTime) -> Option<usize> {
        if self.sorted {
            let at = self.values.partition_point(|&value| value < target);
            (self.values.get(at) == Some(&target)).then_some(at)
        } else {
            self.values.iter().position(|&value| value == target)
        }
    }

    /// Smallest and largest value
    pub fn min_max(&self) -> Option<(NaiveTime, NaiveTime)> {
        min_max(self.values.iter().copied())
    }
}

//-----------------------------------------------------------------------------------------------//

/// A growable list of time values, always searched linearly
#[derive(Clone, Debug, Default)]
pub struct TimeList {
    values: Vec<NaiveTime>,
}

impl TimeList {
    /// Copy values into a list
    pub fn new(values: &[NaiveTime]) -> TimeList {
        TimeList {
            values: values.to_vec(),
        }
    }

    /// The values in their current order
    pub fn as_slice(&self) -> &[NaiveTime] {
        &self.values
    }

    /// Sort ascending
    pub fn sort(&mut self) {
        self.values.sort();
    }

    /// First position of `target`
    pub fn find(&self, target: NaiveTime) -> Option<usize> {
        self.values.iter().position(|&value| value == target)
    }

    /// Smallest and largest value
    pub fn min_max(&self) -> Option<(NaiveTime, NaiveTime)> {
        min_max(self.values.iter().copied())
    }
}

//-----------------------------------------------------------------------------------------------//

/// An insertion-ordered set of time values
#[derive(Clone, Debug, Default)]
pub struct TimeSet {
    values: IndexSet<NaiveTime>,
}

impl TimeSet {
    /// Collect distinct values, keeping the first occurrence of each
    pub fn new(values: &[NaiveTime]) -> TimeSet {
        TimeSet {
            values: values.iter().copied().collect(),
        }
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check membership
    pub fn contains(&self, target: NaiveTime) -> bool {
        self.values.contains(&target)
    }

    /// Check if every value of `values` is in the set
    pub fn covers(&self, values: &[NaiveTime]) -> bool {
        values.iter().all(|value| self.values.contains(value))
    }

    /// Smallest and largest value
    pub fn min_max(&self) -> Option<(NaiveTime, NaiveTime)> {
        min_max(self.values.iter().copied())
    }

    /// Values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        self.values.iter().copied()
    }
}

//-----------------------------------------------------------------------------------------------//

/// A priority queue of time values with the earliest at the head
#[derive(Clone, Debug, Default)]
pub struct TimeQueue {
    heap: BinaryHeap<Reverse<NaiveTime>>,
}

impl TimeQueue {
    /// Queue up values
    pub fn new(values: &[NaiveTime]) -> TimeQueue {
        TimeQueue {
            heap: values.iter().copied().map(Reverse).collect(),
        }
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Check membership by scanning the heap
    pub fn contains(&self, target: NaiveTime) -> bool {
        self.heap.iter().any(|&Reverse(value)| value == target)
    }

    /// Smallest and largest value
    pub fn min_max(&self) -> Option<(NaiveTime, NaiveTime)> {
        min_max(self.heap.iter().map(|&Reverse(value)| value))
    }

    /// The head of the queue, without removing it
    pub fn peek(&self) -> Option<NaiveTime> {
        self.heap.peek().map(|&Reverse(value)| value)
    }

    /// Remove and return the head of the queue
    pub fn poll(&mut self) -> Option<NaiveTime> {
        self.heap.pop().map(|Reverse(value)| value)
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn times(texts: &[&str]) -> Vec<NaiveTime> {
    texts
        .iter()
        .map(|text| crate::times::parse_time(text).unwrap())
        .collect()
}

#[test]
// The array switches from linear to binary search once sorted
fn test_time_array() {
    let values = times(&["12:00", "08:30", "23:15", "08:30", "00:05"]);
    let mut array = TimeArray::new(values.clone());

    assert_eq!(array.find(values[1]), Some(1));
    assert_eq!(array.min_max(), Some((values[4], values[2])));

    array.sort();
    assert!(array.is_sorted());
    assert_eq!(array.as_slice(), times(&["00:05", "08:30", "08:30", "12:00", "23:15"]));
    assert_eq!(array.find(values[1]), Some(1));
    assert_eq!(array.find(values[2]), Some(4));
    assert_eq!(array.find(times(&["09:00"])[0]), None);
    assert_eq!(array.min_max(), Some((values[4], values[2])));

    assert_eq!(TimeArray::default().min_max(), None);
}

#[test]
// The list finds the first match before and after sorting
fn test_time_list() {
    let values = times(&["12:00", "08:30", "23:15"]);
    let mut list = TimeList::new(&values);

    assert_eq!(list.find(values[2]), Some(2));
    list.sort();
    assert_eq!(list.find(values[2]), Some(2));
    assert_eq!(list.find(values[0]), Some(1));
    assert_eq!(list.min_max(), Some((values[1], values[2])));
    assert_eq!(TimeList::default().min_max(), None);
}

#[test]
// The set drops duplicates but still covers the array
fn test_time_set() {
    let values = times(&["12:00", "08:30", "12:00", "07:45"]);
    let set = TimeSet::new(&values);

    assert_eq!(set.len(), 3);
    assert!(set.contains(values[1]));
    assert!(!set.contains(times(&["09:00"])[0]));
    assert!(set.covers(&values));
    assert!(!set.covers(&times(&["09:00"])));
    assert_eq!(set.min_max(), Some((values[3], values[0])));
    assert_eq!(set.iter().collect::<Vec<_>>(), times(&["12:00", "08:30", "07:45"]));
}

#[test]
// The queue hands out the earliest value first
fn test_time_queue() {
    let values = times(&["12:00", "08:30", "23:15", "07:45"]);
    let mut queue = TimeQueue::new(&values);

    assert!(queue.contains(values[2]));
    assert_eq!(queue.min_max(), Some((values[3], values[2])));
    assert_eq!(queue.peek(), Some(values[3]));
    assert_eq!(queue.poll(), Some(values[3]));
    assert_eq!(queue.peek(), Some(values[1]));
    assert_eq!(queue.len(), 3);

    let mut empty = TimeQueue::default();
    assert_eq!(empty.poll(), None);
    assert_eq!(empty.min_max(), None);
}
