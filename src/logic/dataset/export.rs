use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::logic::alert::AlertRecord;

pub const CSV_HEADER: &str = "ID,Description,True Label,Oracle Classification,Classification Match,Rule Level,Rule Priority,Oracle Priority,Priority Match,Justification";

/// Export records to a flat CSV sheet for manual review.
/// Returns the number of rows written.
pub fn export_csv(path: &Path, records: &[AlertRecord]) -> io::Result<usize> {
    let mut file = BufWriter::new(File::create(path)?);
    write_csv(&mut file, records)?;
    file.flush()?;

    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(records.len())
}

pub fn write_csv<W: Write>(out: &mut W, records: &[AlertRecord]) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;

    for record in records {
        let justification = record.oracle_justification.as_deref().unwrap_or("");

        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            quote(&record.id),
            quote(&record.description),
            record.label,
            quote(record.oracle_classification_text()),
            record.classification_agrees.unwrap_or(false),
            record.rule_level,
            record.rule_priority,
            quote(record.oracle_priority_text()),
            record.priority_agrees.unwrap_or(false),
            quote(justification),
        )?;
    }

    Ok(())
}

/// Always quote free text; double embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::Label;
    use serde_json::json;

    #[test]
    fn test_csv_escapes_quotes_and_commas() {
        let mut record = AlertRecord::new("a-1", "rule, with \"quotes\"", Label::Tp, 12, json!({}));
        record.oracle_classification = Some("TP".to_string());
        record.oracle_priority = Some("High".to_string());
        record.oracle_justification = Some("looks bad".to_string());
        record.classification_agrees = Some(true);
        record.priority_agrees = Some(true);

        let mut buf = Vec::new();
        write_csv(&mut buf, &[record]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "\"a-1\",\"rule, with \"\"quotes\"\"\",TP,\"TP\",true,12,High,\"High\",true,\"looks bad\""
        );
    }

    #[test]
    fn test_unclassified_record_exports_missing() {
        let record = AlertRecord::new("b", "d", Label::Fp, -1, json!({}));

        let mut buf = Vec::new();
        write_csv(&mut buf, &[record]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.lines().nth(1).unwrap().contains("\"MISSING\",false,-1,MISSING"));
    }
}
