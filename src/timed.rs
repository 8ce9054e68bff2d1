//! Wall-clock timing of drill steps
#![warn(missing_docs)]

use std::time::{Duration, Instant};

use tracing::info;

/// A running measurement of one labelled operation.
///
/// Timing is purely observational; the elapsed time is reported through `tracing` when the
/// measurement finishes.
#[must_use = "call `finish` to report the elapsed time"]
pub struct TimedOperation<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> TimedOperation<'a> {
    /// Start timing `label`
    pub fn start(label: &'a str) -> TimedOperation<'a> {
        TimedOperation {
            label,
            start: Instant::now(),
        }
    }

    /// Stop timing, report and return the elapsed time
    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        info!(
            operation = self.label,
            elapsed_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            "operation finished"
        );
        elapsed
    }
}

/// Run `work`, reporting how long it took under `label`
pub fn timed<T>(label: &str, work: impl FnOnce() -> T) -> T {
    let operation = TimedOperation::start(label);
    let result = work();
    operation.finish();
    result
}

#[test]
// Timing passes the result through untouched
fn test_timed() {
    let value = timed("sum", || (1..=10).sum::<i32>());
    assert_eq!(value, 55);

    let operation = TimedOperation::start("sleep");
    std::thread::sleep(Duration::from_millis(2));
    assert!(operation.finish() >= Duration::from_millis(2));
}
