//! The drills: fixed sequences of operations with a printed report
//!
//! Every drill writes its report to a `Write` sink and times each step with `timed`. Misses are
//! reported as ordinary lines, never as errors; the only errors are from the sink itself.

use std::{
    io::{self, Write},
    path::Path,
};

use chrono::NaiveTime;
use tracing::info;

use crate::{
    config::OperationTargets,
    series::{TimeArray, TimeList, TimeQueue, TimeSet},
    store::{KeyedMapStore, Slot},
    timed::timed,
    times::{format_time, save_sorted},
};

//-----------------------------------------------------------------------------------------------//

/// Run the keyed-map drill over the hash-table slot, then the insertion-ordered slot.
pub fn run_map_drill<W: Write>(
    out: &mut W,
    store: &mut KeyedMapStore,
    targets: &OperationTargets,
) -> io::Result<()> {
    for (index, slot) in Slot::ALL.into_iter().enumerate() {
        if index > 0 {
            writeln!(out, "\n")?;
        }
        run_slot(out, store, slot, targets)?;
    }
    Ok(())
}

fn run_slot<W: Write>(
    out: &mut W,
    store: &mut KeyedMapStore,
    slot: Slot,
    targets: &OperationTargets,
) -> io::Result<()> {
    info!(%slot, "starting map drill");
    writeln!(out, "========= {slot} operations =========")?;
    writeln!(out, "Initial {slot} size: {}", store.mapping(slot).len())?;

    report_search_by_key(out, store, slot, targets)?;
    report_search_by_value(out, store, slot, targets)?;

    print_mapping(out, store, slot)?;
    timed(&format!("sort {slot} by key"), || store.sort_by_key(slot));
    print_mapping(out, store, slot)?;

    report_search_by_key(out, store, slot, targets)?;
    report_search_by_value(out, store, slot, targets)?;

    timed(&format!("insert into {slot}"), || {
        store.insert(slot, targets.key_insert.clone(), targets.value_insert.clone())
    });
    writeln!(
        out,
        "Added entry: key='{}', owner='{}'",
        targets.key_insert, targets.value_insert
    )?;

    let removed = timed(&format!("remove by key from {slot}"), || {
        store.remove_by_key(slot, &targets.key_target)
    });
    match removed {
        Some(value) => writeln!(
            out,
            "Removed entry with key '{}'. Owner was: {value}",
            targets.key_target
        )?,
        None => writeln!(out, "Key '{}' not found for removal.", targets.key_target)?,
    }

    let count = timed(&format!("remove by value from {slot}"), || {
        store.remove_by_value(slot, &targets.value_target)
    });
    writeln!(
        out,
        "Removed {count} entries with owner '{}'",
        targets.value_target
    )?;

    writeln!(out, "Final {slot} size: {}", store.mapping(slot).len())
}

fn report_search_by_key<W: Write>(
    out: &mut W,
    store: &KeyedMapStore,
    slot: Slot,
    targets: &OperationTargets,
) -> io::Result<()> {
    let key = &targets.key_target;
    match timed(&format!("search {slot} by key"), || store.search_by_key(slot, key)) {
        Some(value) => writeln!(out, "Entry with key '{key}' found. Owner: {value}"),
        None => writeln!(out, "Entry with key '{key}' is absent from {slot}."),
    }
}

fn report_search_by_value<W: Write>(
    out: &mut W,
    store: &KeyedMapStore,
    slot: Slot,
    targets: &OperationTargets,
) -> io::Result<()> {
    let value = targets.value_target.as_str();
    match timed(&format!("binary search {slot} by value"), || {
        store.search_by_value(slot, value)
    }) {
        Some(key) => writeln!(out, "Owner '{value}' found. Key: {key}"),
        None => writeln!(out, "Owner '{value}' is absent from {slot}."),
    }
}

fn print_mapping<W: Write>(out: &mut W, store: &KeyedMapStore, slot: Slot) -> io::Result<()> {
    writeln!(out, "\n=== Key/value pairs in {slot} ===")?;
    timed(&format!("print {slot}"), || {
        store
            .mapping(slot)
            .iter()
            .try_for_each(|(key, value)| writeln!(out, "  {key} -> {value}"))
    })
}

//-----------------------------------------------------------------------------------------------//

// Search, extremes, sort, search, extremes over the array, then save it
fn array_steps<W: Write>(
    out: &mut W,
    array: &mut TimeArray,
    target: NaiveTime,
    source: &Path,
) -> io::Result<()> {
    report_array_find(out, array, target)?;
    report_array_min_max(out, array)?;

    timed("sort time array", || array.sort());

    report_array_find(out, array, target)?;
    report_array_min_max(out, array)?;

    save_sorted(source, array.as_slice());
    Ok(())
}

fn report_array_find<W: Write>(
    out: &mut W,
    array: &TimeArray,
    target: NaiveTime,
) -> io::Result<()> {
    let target_text = format_time(target);
    match timed("find in time array", || array.find(target)) {
        Some(position) => writeln!(
            out,
            "Value '{target_text}' found in array at position: {position}"
        ),
        None => writeln!(out, "Value '{target_text}' is absent from the array."),
    }
}

fn report_array_min_max<W: Write>(out: &mut W, array: &TimeArray) -> io::Result<()> {
    report_min_max(out, "array", timed("min/max of time array", || array.min_max()))
}

fn report_min_max<W: Write>(
    out: &mut W,
    shape: &str,
    bounds: Option<(NaiveTime, NaiveTime)>,
) -> io::Result<()> {
    match bounds {
        Some((min, max)) => {
            writeln!(out, "Smallest value in {shape}: {}", format_time(min))?;
            writeln!(out, "Largest value in {shape}: {}", format_time(max))
        }
        None => writeln!(out, "The {shape} is empty."),
    }
}

fn report_contains<W: Write>(
    out: &mut W,
    shape: &str,
    target: NaiveTime,
    found: bool,
) -> io::Result<()> {
    let target_text = format_time(target);
    if found {
        writeln!(out, "Value '{target_text}' found in {shape}.")
    } else {
        writeln!(out, "Value '{target_text}' is absent from {shape}.")
    }
}

/// Run the list drill: search and extremes over a list before and after sorting it, then the
/// same over the array, saving the sorted array next to `source`.
pub fn run_list_drill<W: Write>(
    out: &mut W,
    values: &[NaiveTime],
    target: NaiveTime,
    source: &Path,
) -> io::Result<()> {
    info!(count = values.len(), "starting list drill");
    writeln!(out, "========= List operations =========")?;

    let mut list = TimeList::new(values);
    let report_list = |out: &mut W, list: &TimeList| -> io::Result<()> {
        let target_text = format_time(target);
        match timed("find in time list", || list.find(target)) {
            Some(position) => {
                writeln!(out, "Value '{target_text}' found in list at position: {position}")?
            }
            None => writeln!(out, "Value '{target_text}' is absent from the list.")?,
        }
        report_min_max(out, "list", timed("min/max of time list", || list.min_max()))
    };

    report_list(out, &list)?;
    timed("sort time list", || list.sort());
    report_list(out, &list)?;

    array_steps(out, &mut TimeArray::new(values.to_vec()), target, source)
}

/// Run the set drill: membership, extremes and coverage of the array by the set, then the array
/// steps.
pub fn run_set_drill<W: Write>(
    out: &mut W,
    values: &[NaiveTime],
    target: NaiveTime,
    source: &Path,
) -> io::Result<()> {
    info!(count = values.len(), "starting set drill");
    writeln!(out, "========= Set operations =========")?;

    let set = TimeSet::new(values);
    let found = timed("find in time set", || set.contains(target));
    report_contains(out, "set", target, found)?;
    report_min_max(out, "set", timed("min/max of time set", || set.min_max()))?;

    writeln!(out, "Number of values in array: {}", values.len())?;
    writeln!(out, "Number of values in set: {}", set.len())?;
    if set.covers(values) {
        writeln!(out, "Every array value is present in the set.")?;
    } else {
        writeln!(out, "Not every array value is present in the set.")?;
    }

    array_steps(out, &mut TimeArray::new(values.to_vec()), target, source)
}

/// Run the queue drill: membership and extremes, then peek, poll and peek again, then the array
/// steps.
pub fn run_queue_drill<W: Write>(
    out: &mut W,
    values: &[NaiveTime],
    target: NaiveTime,
    source: &Path,
) -> io::Result<()> {
    info!(count = values.len(), "starting queue drill");
    writeln!(out, "========= Queue operations =========")?;

    let mut queue = TimeQueue::new(values);
    let found = timed("find in time queue", || queue.contains(target));
    report_contains(out, "queue", target, found)?;
    report_min_max(out, "queue", timed("min/max of time queue", || queue.min_max()))?;

    if queue.is_empty() {
        writeln!(out, "The queue is empty.")?;
    } else {
        let head = |value: Option<NaiveTime>| value.map(format_time).unwrap_or_default();
        writeln!(out, "Queue head (peek): {}", head(queue.peek()))?;
        writeln!(out, "Removed queue head (poll): {}", head(queue.poll()))?;
        writeln!(out, "New queue head (peek): {}", head(queue.peek()))?;
    }

    array_steps(out, &mut TimeArray::new(values.to_vec()), target, source)
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn report<F>(drill: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut out = Vec::new();
    drill(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
// The map drill runs every step on both slots with the default targets
fn test_map_drill() {
    let mut store = KeyedMapStore::from_pairs(crate::config::sample_pairs());
    let targets = OperationTargets::default();

    let text = report(|out| run_map_drill(out, &mut store, &targets));

    assert!(text.contains("========= HashMap operations ========="));
    assert!(text.contains("========= LinkedHashMap operations ========="));
    assert_eq!(text.matches("Initial HashMap size: 10").count(), 1);
    assert_eq!(
        text.matches("found. Owner: Дмитро").count(),
        4,
        "key found before and after sorting in both slots"
    );
    assert_eq!(text.matches("Owner 'Олександр' found.").count(), 4);
    assert_eq!(text.matches("Owner was: Дмитро").count(), 2);
    assert_eq!(text.matches("Removed 2 entries with owner 'Олександр'").count(), 2);

    // 10 + 1 inserted - 1 removed by key - 2 removed by value
    assert!(text.contains("Final HashMap size: 8"));
    assert!(text.contains("Final LinkedHashMap size: 8"));
    assert_eq!(store.mapping(Slot::Hashed).len(), 8);
    assert!(store.mapping(Slot::Hashed).is_ordered());
}

#[test]
// Misses are reported as lines, not errors
fn test_map_drill_misses() {
    let mut store = KeyedMapStore::from_pairs(crate::config::sample_pairs());
    let targets = OperationTargets::default().overlay(
        Some(crate::key::OrderedKey::new("Нема", "Ніде")),
        None,
        Some("Ніхто"),
        None,
    );

    let text = report(|out| run_map_drill(out, &mut store, &targets));

    assert!(text.contains("is absent from HashMap."));
    assert!(text.contains("Owner 'Ніхто' is absent from LinkedHashMap."));
    assert!(text.contains("not found for removal."));
    assert!(text.contains("Removed 0 entries with owner 'Ніхто'"));
    assert!(text.contains("Final LinkedHashMap size: 11"));
}

#[test]
// The time drills report searches, extremes and queue heads, and save the sorted array
fn test_time_drills() {
    use crate::times::{load_times, parse_time, sorted_path};

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("times.txt");
    let values: Vec<NaiveTime> = ["12:00", "08:30", "23:15", "07:45", "08:30"]
        .iter()
        .map(|text| parse_time(text).unwrap())
        .collect();
    let target = parse_time("08:30").unwrap();

    let text = report(|out| run_list_drill(out, &values, target, &source));
    assert!(text.contains("Value '08:30' found in list at position: 1"));
    assert!(text.contains("Value '08:30' found in array at position: 1"));
    assert!(text.contains("Smallest value in list: 07:45"));
    assert!(text.contains("Largest value in array: 23:15"));

    let mut sorted = values.clone();
    sorted.sort();
    assert_eq!(load_times(&sorted_path(&source)).unwrap(), sorted);

    let text = report(|out| run_set_drill(out, &values, target, &source));
    assert!(text.contains("Value '08:30' found in set."));
    assert!(text.contains("Number of values in set: 4"));
    assert!(text.contains("Every array value is present in the set."));

    let text = report(|out| run_queue_drill(out, &values, target, &source));
    assert!(text.contains("Queue head (peek): 07:45"));
    assert!(text.contains("Removed queue head (poll): 07:45"));
    assert!(text.contains("New queue head (peek): 08:30"));

    let text = report(|out| run_queue_drill(out, &[], target, &source));
    assert!(text.contains("The queue is empty."));
    assert!(text.contains("The array is empty."));
}
