//! Tab-separated trajectory reader.
//!
//! # Format
//!
//! ```text
//! # description: corridor experiment
//! # framerate: 16 fps
//! 1	0	0.00	0.00	0.00
//! 1	1	0.05	0.00	0.00
//! 2	0	3.10	1.20	0.00
//! ```
//!
//! Leading `#` lines are comments; those mentioning `framerate` (any case)
//! set the sampling rate from the first token after the `:`, the last such
//! line winning. Data rows carry five unlabeled columns: agent id, frame,
//! x, y, z.

use crate::prelude::{StageError, StageResult};
use crate::trajectory::row::TrajectoryRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

const COLUMNS: [&str; 5] = ["agent id", "frame", "x", "y", "z"];

/// Parsed input: raw rows in file order plus the sampling rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryTable {
    pub frame_rate: u32,
    /// `false` when the rate fell back to the default.
    pub frame_rate_from_header: bool,
    pub rows: Vec<TrajectoryRow>,
}

/// Reads and parses a trajectory file.
pub fn read_trajectory_file<P: AsRef<Path>>(
    path: P,
    fallback_frame_rate: u32,
) -> StageResult<TrajectoryTable> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref).map_err(|source| {
        if source.kind() == ErrorKind::InvalidData {
            StageError::MalformedInput(format!("{} is not valid UTF-8", path_ref.display()))
        } else {
            StageError::FileAccess {
                path: path_ref.to_path_buf(),
                source,
            }
        }
    })?;
    parse_trajectory(&contents, fallback_frame_rate)
}

/// Parses trajectory text already held in memory.
pub fn parse_trajectory(contents: &str, fallback_frame_rate: u32) -> StageResult<TrajectoryTable> {
    let header_rate = scan_frame_rate(contents)?;
    let frame_rate = match header_rate {
        Some(rate) => {
            debug!("frame rate {} read from header", rate);
            rate
        }
        None => {
            warn!(
                "no framerate header found, assuming {} fps",
                fallback_frame_rate
            );
            fallback_frame_rate
        }
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| StageError::MalformedInput(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(parse_row(&record)?);
    }

    Ok(TrajectoryTable {
        frame_rate,
        frame_rate_from_header: header_rate.is_some(),
        rows,
    })
}

/// Looks through the leading comment block for a `framerate` entry. A later
/// entry overrides an earlier one.
fn scan_frame_rate(contents: &str) -> StageResult<Option<u32>> {
    let mut frame_rate = None;
    for line in contents.lines() {
        if !line.starts_with('#') {
            break;
        }
        if line.to_lowercase().contains("framerate") {
            frame_rate = Some(parse_frame_rate(line)?);
        }
    }
    Ok(frame_rate)
}

fn parse_frame_rate(line: &str) -> StageResult<u32> {
    let token = line
        .split(':')
        .nth(1)
        .and_then(|value| value.split_whitespace().next())
        .ok_or_else(|| {
            StageError::MalformedInput(format!("framerate header has no value: {line:?}"))
        })?;
    let rate: i64 = token.parse().map_err(|_| {
        StageError::MalformedInput(format!("framerate {token:?} is not an integer"))
    })?;
    u32::try_from(rate)
        .ok()
        .filter(|&rate| rate > 0)
        .ok_or_else(|| StageError::MalformedInput(format!("framerate must be positive, got {rate}")))
}

fn parse_row(record: &StringRecord) -> StageResult<TrajectoryRow> {
    let line = record.position().map_or(0, |p| p.line());
    // A trailing tab yields an empty extra field; anything beyond that is an error.
    if record.len() < COLUMNS.len() || record.iter().skip(COLUMNS.len()).any(|f| !f.is_empty()) {
        return Err(StageError::MalformedInput(format!(
            "line {line}: expected {} tab-separated columns, found {}",
            COLUMNS.len(),
            record.len()
        )));
    }

    Ok(TrajectoryRow {
        agent_id: parse_field(record, 0, line)?,
        frame: parse_field(record, 1, line)?,
        x: parse_field(record, 2, line)?,
        y: parse_field(record, 3, line)?,
        z: parse_field(record, 4, line)?,
    })
}

fn parse_field<T: FromStr>(record: &StringRecord, index: usize, line: u64) -> StageResult<T> {
    let raw = record.get(index).unwrap_or_default();
    raw.parse().map_err(|_| {
        StageError::MalformedInput(format!(
            "line {line}: invalid {} {raw:?}",
            COLUMNS[index]
        ))
    })
}
