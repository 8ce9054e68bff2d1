//! ## Introduction
//!
//! This crate drills the everyday operations of keyed collections: searching by key, searching by
//! value, sorting, inserting and deleting. It runs them against a hash table and an
//! insertion-ordered map holding the same entries, and against a list, a set and a priority queue
//! of time-of-day values read from a file. Each step is timed and reported.
//!
//! ## Keys
//!
//! Keys are `OrderedKey`s: a primary and a secondary label, either of which may be absent. Their
//! ordering, equality and hash all come from the `CoherentKey` trait, so that keys which compare
//! equal always hash alike and a sorted collection and a hash table agree on which keys are the
//! same. Keys sort by primary label, then by secondary label, both in descending order with
//! absent labels last.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type              | Holds              | Ordered By            |
//! |:------------------|:-------------------|:----------------------|
//! | `KeyedMapStore`   | Two keyed mappings | Hash or insertion     |
//! | `SortedMap`       | Key/Value          | Ord                   |
//! | `SortedMapBy`     | Key/Value          | Function              |
//! | `TimeArray`       | Times              | Position, then sorted |
//! | `TimeList`        | Times              | Position              |
//! | `TimeSet`         | Distinct times     | Insertion             |
//! | `TimeQueue`       | Times              | Earliest first        |
//!
//! </center>
//!
//! Sorting by key goes through `SortedMap`, a splay tree built on `util::Tree`. The tree manages
//! `usize` indices into an external vector of (key, value) pairs without storing the pairs itself.
//!
//! Sorting and searching by value uses `ValueComparator`, which only ever looks at the value of
//! an entry, so a search probe can be a bare value wrapped in a `ValueProbe`.

#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod error;
pub mod key;
mod map;
pub mod series;
pub mod store;
pub mod timed;
pub mod times;
pub mod util;
pub mod value;

pub use config::OperationTargets;
pub use error::{Error, Result};
pub use key::{CoherentKey, OrderedKey};
pub use map::*;
pub use store::{KeyedMapStore, KeyedMapping, Slot};
pub use value::{ValueComparator, ValueProbe};
