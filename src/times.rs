//! Reading and writing newline-delimited time-of-day files
#![warn(missing_docs)]

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveTime, Timelike};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse an ISO local time: `HH:MM`, `HH:MM:SS` or `HH:MM:SS` with a fraction of up to nine
/// digits.
pub fn parse_time(text: &str) -> std::result::Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|error| NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| error))
}

/// Format a time in its shortest ISO form.
///
/// Seconds are omitted when they and the fraction are zero, and the fraction is printed in
/// groups of three digits, as few as needed.
pub fn format_time(time: NaiveTime) -> String {
    // Leap seconds are carried in the nanosecond field
    let (second, nano) = match time.nanosecond() {
        nano @ 1_000_000_000.. => (60, nano - 1_000_000_000),
        nano => (time.second(), nano),
    };

    let mut text = format!("{:02}:{:02}", time.hour(), time.minute());
    if second == 0 && nano == 0 {
        return text;
    }

    text.push_str(&format!(":{second:02}"));
    if nano == 0 {
        // whole seconds
    } else if nano % 1_000_000 == 0 {
        text.push_str(&format!(".{:03}", nano / 1_000_000));
    } else if nano % 1_000 == 0 {
        text.push_str(&format!(".{:06}", nano / 1_000));
    } else {
        text.push_str(&format!(".{nano:09}"));
    }
    text
}

/// Load every time value in a file.
///
/// Lines are trimmed, a leading byte order mark is dropped and blank lines are skipped. The first
/// line that does not parse fails the whole load.
pub fn load_times(path: &Path) -> Result<Vec<NaiveTime>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut times = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let text = line.trim().trim_start_matches(BYTE_ORDER_MARK);
        if text.is_empty() {
            continue;
        }

        let time = parse_time(text).map_err(|source| Error::MalformedTime {
            path: path.to_path_buf(),
            line: index + 1,
            text: text.to_string(),
            source,
        })?;
        times.push(time);
    }

    debug!(path = %path.display(), count = times.len(), "loaded time values");
    Ok(times)
}

/// Write time values one per line, without a trailing newline
pub fn write_times(path: &Path, times: &[NaiveTime]) -> Result<()> {
    let content = times
        .iter()
        .map(|&time| format_time(time))
        .collect::<Vec<_>>()
        .join("\n");

    fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// The file that sorted values of `path` are saved to: the same path with `.sorted` appended
pub fn sorted_path(path: &Path) -> PathBuf {
    let mut sorted = OsString::from(path.as_os_str());
    sorted.push(".sorted");
    PathBuf::from(sorted)
}

/// Save sorted values next to their source file.
///
/// A write failure is logged and otherwise ignored so the calling drill can carry on. Returns
/// whether the file was written.
pub fn save_sorted(source: &Path, times: &[NaiveTime]) -> bool {
    let path = sorted_path(source);
    match write_times(&path, times) {
        Ok(()) => {
            info!(path = %path.display(), count = times.len(), "saved sorted time values");
            true
        }
        Err(error) => {
            warn!(%error, "could not save sorted time values");
            false
        }
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn time(text: &str) -> NaiveTime {
    parse_time(text).unwrap()
}

#[test]
// All ISO forms parse and print back in their shortest form
fn test_time_text() {
    assert_eq!(time("08:30"), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    assert_eq!(time("08:30:15"), NaiveTime::from_hms_opt(8, 30, 15).unwrap());

    for text in ["08:30", "08:30:15", "00:00:01", "23:59:59.120", "10:15:00.000120", "10:15:00.000000001"] {
        assert_eq!(format_time(time(text)), text);
    }
    assert_eq!(format_time(time("08:30:00")), "08:30");
    assert_eq!(format_time(time("08:30:00.5")), "08:30:00.500");

    assert!(parse_time("8h30").is_err());
    assert!(parse_time("25:00").is_err());
}

#[test]
// Loading skips blank lines and a byte order mark, and reports the first bad line
fn test_load_times() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("times.txt");
    fs::write(&path, "\u{feff}10:15:30\n\n  08:00 \r\n23:59:59.999\n").unwrap();
    let times = load_times(&path).unwrap();
    assert_eq!(times, vec![time("10:15:30"), time("08:00"), time("23:59:59.999")]);

    let path = dir.path().join("broken.txt");
    fs::write(&path, "10:15\nnoon\n11:00\n").unwrap();
    match load_times(&path) {
        Err(Error::MalformedTime { line, text, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(text, "noon");
        }
        other => panic!("unexpected result {other:?}"),
    }

    let missing = dir.path().join("missing.txt");
    assert!(matches!(load_times(&missing), Err(Error::Read { .. })));
}

#[test]
// Saving writes next to the source, and a failed write is swallowed
fn test_save_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("times.txt");
    let times = [time("08:00"), time("09:30:05"), time("12:00:00.250")];

    assert_eq!(sorted_path(&source), dir.path().join("times.txt.sorted"));
    assert!(save_sorted(&source, &times));
    assert_eq!(
        fs::read_to_string(sorted_path(&source)).unwrap(),
        "08:00\n09:30:05\n12:00:00.250"
    );
    assert_eq!(load_times(&sorted_path(&source)).unwrap(), times.to_vec());

    let nowhere = dir.path().join("no-such-dir").join("times.txt");
    assert!(!save_sorted(&nowhere, &times));
    assert!(matches!(
        write_times(&sorted_path(&nowhere), &times),
        Err(Error::Write { .. })
    ));
}
