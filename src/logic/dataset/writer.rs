use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::logic::alert::AlertRecord;

fn create(path: &Path) -> io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

fn write_lines<W: Write>(out: &mut W, records: &[AlertRecord]) -> io::Result<()> {
    for record in records {
        let json = serde_json::to_string(record)?;
        writeln!(out, "{}", json)?;
    }
    out.flush()
}

/// Write records as JSONL (truncates). Returns the number written.
pub fn write_records(path: &Path, records: &[AlertRecord]) -> io::Result<usize> {
    let mut file = create(path)?;
    write_lines(&mut file, records)?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(records.len())
}

/// Replace `path` with the full batch in one step.
///
/// The batch goes to a `.partial` sibling first and is renamed over the
/// target, so a reader never sees a half-written file.
pub fn replace_records(path: &Path, records: &[AlertRecord]) -> io::Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    {
        let mut file = create(&partial)?;
        write_lines(&mut file, records)?;
        file.get_ref().sync_data()?;
    }
    fs::rename(&partial, path)?;

    log::debug!("Checkpointed {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let mut file = create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    writeln!(file)?;
    file.flush()
}
