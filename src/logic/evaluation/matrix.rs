//! Confusion Matrix
//!
//! Rows = ground truth, columns = prediction, both in the fixed label order.
//! Pairs with either side outside the label set are not counted.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<u64>>,
}

/// Flattened 2x2 matrix, second label is the positive class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinaryCounts {
    pub true_negatives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_positives: u64,
}

impl ConfusionMatrix {
    pub fn build<'a, I>(labels: &[&str], pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let n = labels.len();
        let mut cells = vec![vec![0u64; n]; n];
        let index = |s: &str| labels.iter().position(|l| *l == s);

        for (truth, prediction) in pairs {
            if let (Some(row), Some(col)) = (index(truth), index(prediction)) {
                cells[row][col] += 1;
            }
        }

        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            cells,
        }
    }

    /// Number of pairs that landed in the matrix
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    pub fn get(&self, truth: &str, prediction: &str) -> Option<u64> {
        let row = self.labels.iter().position(|l| l == truth)?;
        let col = self.labels.iter().position(|l| l == prediction)?;
        Some(self.cells[row][col])
    }

    /// Diagonal sum
    pub fn agreements(&self) -> u64 {
        (0..self.labels.len()).map(|i| self.cells[i][i]).sum()
    }

    /// `(tn, fp, fn, tp)` for a two-label matrix, `None` otherwise
    pub fn binary_counts(&self) -> Option<BinaryCounts> {
        match self.cells.as_slice() {
            [negative, positive] if negative.len() == 2 && positive.len() == 2 => Some(BinaryCounts {
                true_negatives: negative[0],
                false_positives: negative[1],
                false_negatives: positive[0],
                true_positives: positive[1],
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|l| l.len())
            .chain(self.cells.iter().flatten().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1)
            .max(5);

        write!(f, "{:>width$}", "t\\p", width = width)?;
        for label in &self.labels {
            write!(f, " {:>width$}", label, width = width)?;
        }
        writeln!(f)?;

        for (label, row) in self.labels.iter().zip(&self.cells) {
            write!(f, "{:>width$}", label, width = width)?;
            for cell in row {
                write!(f, " {:>width$}", cell, width = width)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
