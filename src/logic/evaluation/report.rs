//! Report Rendering
//!
//! Plain-text rendering of evaluation results for the terminal.
//! The JSON form comes straight from the serde derives.

use std::fmt;

use super::engine::{EvaluationReport, SpaceReport};
use super::metrics::AverageMetrics;

fn average_row(f: &mut fmt::Formatter<'_>, name: &str, avg: &AverageMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>9.4} {:>9.4} {:>9.4} {:>9}",
        name, avg.precision, avg.recall, avg.f1, avg.support
    )
}

impl fmt::Display for SpaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        writeln!(f, "Confusion matrix (rows: truth, columns: prediction)")?;
        write!(f, "{}", self.confusion_matrix)?;
        writeln!(f)?;

        writeln!(f, "{:>14} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1", "support")?;
        for class in &self.per_class {
            writeln!(
                f,
                "{:>14} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                class.label, class.precision, class.recall, class.f1, class.support
            )?;
        }
        average_row(f, "macro avg", &self.macro_avg)?;
        average_row(f, "weighted avg", &self.weighted_avg)?;

        if let Some(rates) = &self.rates {
            writeln!(f)?;
            writeln!(f, "TPR: {:.4}", rates.tpr)?;
            writeln!(f, "FPR: {:.4}", rates.fpr)?;
            writeln!(f, "FNR: {:.4}", rates.fnr)?;
        }
        if let Some(macro_f1) = self.macro_f1 {
            writeln!(f)?;
            writeln!(f, "Macro F1: {:.4}", macro_f1)?;
        }
        if self.excluded > 0 {
            writeln!(f, "({} pairs outside the label set)", self.excluded)?;
        }

        Ok(())
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records: {}", self.total_records)?;
        writeln!(f)?;
        writeln!(f, "{}", self.classification)?;
        writeln!(f, "{}", self.priority)?;
        write!(f, "{}", self.high_critical)
    }
}
