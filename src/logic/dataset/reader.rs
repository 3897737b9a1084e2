use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::logic::alert::AlertRecord;
use crate::logic::error::{RejectedLine, TriageResult};

/// Records read from a JSONL file plus the lines that did not parse
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub records: Vec<AlertRecord>,
    pub rejected: Vec<RejectedLine>,
}

/// Non-blank lines with their 1-based line numbers
pub fn read_lines(path: &Path) -> io::Result<Vec<(usize, String)>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push((idx + 1, line));
        }
    }

    Ok(lines)
}

/// Read an `AlertRecord` per line. Unparseable lines are skipped and logged,
/// only an unreadable file fails the call.
pub fn read_records(path: &Path) -> TriageResult<RecordBatch> {
    let mut batch = RecordBatch::default();

    for (line_no, line) in read_lines(path)? {
        match serde_json::from_str::<AlertRecord>(&line) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                let rejected = RejectedLine::new(line_no, e.to_string(), &line);
                log::warn!("Skipping malformed line {}: {}...", line_no, rejected.excerpt);
                batch.rejected.push(rejected);
            }
        }
    }

    log::info!(
        "Read {} records from {} ({} malformed)",
        batch.records.len(),
        path.display(),
        batch.rejected.len()
    );

    Ok(batch)
}
