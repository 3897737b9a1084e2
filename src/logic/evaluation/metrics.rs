//! Classification Metrics
//!
//! Per-class precision/recall/F1, their averages, and binary rates.
//! Every ratio with a zero denominator is 0.

use serde::Serialize;

use super::matrix::BinaryCounts;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinaryRates {
    /// tp / (tp + fn)
    pub tpr: f64,
    /// fp / (fp + tn)
    pub fpr: f64,
    /// fn / (tp + fn)
    pub fnr: f64,
}

pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Per-class metrics over all pairs.
///
/// A pair whose prediction is outside the label set still counts toward the
/// support of its truth class, so it lowers recall.
pub fn class_metrics<'a, I>(labels: &[&str], pairs: I) -> Vec<ClassMetrics>
where
    I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    labels
        .iter()
        .map(|label| {
            let mut hits = 0u64;
            let mut predicted = 0u64;
            let mut support = 0u64;

            for (truth, prediction) in pairs.clone() {
                let t = truth == *label;
                let p = prediction == *label;
                if t && p {
                    hits += 1;
                }
                if p {
                    predicted += 1;
                }
                if t {
                    support += 1;
                }
            }

            let precision = ratio(hits, predicted);
            let recall = ratio(hits, support);
            ClassMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1: harmonic_mean(precision, recall),
                support,
            }
        })
        .collect()
}

/// Unweighted mean over classes
pub fn macro_average(classes: &[ClassMetrics]) -> AverageMetrics {
    let n = classes.len() as f64;
    let support = classes.iter().map(|c| c.support).sum();
    if classes.is_empty() {
        return AverageMetrics { precision: 0.0, recall: 0.0, f1: 0.0, support };
    }

    AverageMetrics {
        precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
        recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
        f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
        support,
    }
}

/// Mean over classes weighted by support
pub fn weighted_average(classes: &[ClassMetrics]) -> AverageMetrics {
    let support: u64 = classes.iter().map(|c| c.support).sum();
    if support == 0 {
        return AverageMetrics { precision: 0.0, recall: 0.0, f1: 0.0, support };
    }

    let weighted = |f: fn(&ClassMetrics) -> f64| {
        classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / support as f64
    };

    AverageMetrics {
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1: weighted(|c| c.f1),
        support,
    }
}

impl BinaryRates {
    pub fn from_counts(counts: &BinaryCounts) -> Self {
        let positives = counts.true_positives + counts.false_negatives;
        let negatives = counts.false_positives + counts.true_negatives;

        Self {
            tpr: ratio(counts.true_positives, positives),
            fpr: ratio(counts.false_positives, negatives),
            fnr: ratio(counts.false_negatives, positives),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_per_class_counts_include_out_of_set_predictions() {
        let pairs = [("TP", "TP"), ("TP", "ERROR"), ("FP", "FP"), ("FP", "TP")];
        let classes = class_metrics(&["FP", "TP"], pairs);

        let fp = &classes[0];
        assert_eq!(fp.support, 2);
        assert!(close(fp.precision, 1.0));
        assert!(close(fp.recall, 0.5));

        let tp = &classes[1];
        assert_eq!(tp.support, 2);
        assert!(close(tp.precision, 0.5));
        assert!(close(tp.recall, 0.5));
        assert!(close(tp.f1, 0.5));
    }

    #[test]
    fn test_absent_class_scores_zero() {
        let classes = class_metrics(&["Critical", "High"], [("High", "High")]);
        assert_eq!(classes[0].support, 0);
        assert_eq!(classes[0].f1, 0.0);
        assert!(close(classes[1].f1, 1.0));

        let avg = macro_average(&classes);
        assert!(close(avg.f1, 0.5));
        assert_eq!(avg.support, 1);

        let weighted = weighted_average(&classes);
        assert!(close(weighted.f1, 1.0));
    }

    #[test]
    fn test_averages_of_nothing_are_zero() {
        assert_eq!(macro_average(&[]).f1, 0.0);
        assert_eq!(weighted_average(&[]).f1, 0.0);
    }

    #[test]
    fn test_rates_from_counts() {
        let rates = BinaryRates::from_counts(&BinaryCounts {
            true_negatives: 3,
            false_positives: 1,
            false_negatives: 1,
            true_positives: 3,
        });
        assert!(close(rates.tpr, 0.75));
        assert!(close(rates.fpr, 0.25));
        assert!(close(rates.fnr, 0.25));
    }

    #[test]
    fn test_rates_with_no_positives_are_zero_not_nan() {
        let rates = BinaryRates::from_counts(&BinaryCounts {
            true_negatives: 4,
            false_positives: 0,
            false_negatives: 0,
            true_positives: 0,
        });
        assert_eq!(rates.tpr, 0.0);
        assert_eq!(rates.fnr, 0.0);
        assert_eq!(rates.fpr, 0.0);

        let empty = BinaryRates::from_counts(&BinaryCounts {
            true_negatives: 0,
            false_positives: 0,
            false_negatives: 0,
            true_positives: 0,
        });
        assert!(!empty.tpr.is_nan() && !empty.fpr.is_nan() && !empty.fnr.is_nan());
    }
}
