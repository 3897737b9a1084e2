//! Dataset Module - Line-delimited record storage
//!
//! Every stage reads and writes the same JSONL record shape, one
//! `AlertRecord` per line. Output names carry the stage number and a
//! timestamp so reruns never overwrite earlier results.

pub mod reader;
pub mod writer;
pub mod export;


use std::path::{Path, PathBuf};

use chrono::Local;

use crate::constants::FILE_TIMESTAMP_FORMAT;

pub use reader::{read_lines, read_records, RecordBatch};
pub use writer::{replace_records, write_json, write_records};
pub use export::{export_csv, CSV_HEADER};

/// Timestamp fragment for generated file names
pub fn file_timestamp() -> String {
    Local::now().format(FILE_TIMESTAMP_FORMAT).to_string()
}

/// Input file name without directory and extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("alerts")
        .to_string()
}

/// `<dir>/<stage>_<name>`
pub fn stage_output(dir: &Path, stage: u8, name: &str) -> PathBuf {
    dir.join(format!("{}_{}", stage, name))
}
