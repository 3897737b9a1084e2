//! Pipeline Stages
//!
//! File-to-file stages, in run order:
//! 1. preprocess: raw export -> labeled, deduplicated records
//! 2. merge: TP + FP batches -> one shuffled batch
//! 3. classify: oracle pass (resumable)
//! 4. postprocess: reconcile formatting mismatches
//! 5. evaluate: metrics over the three label spaces
//! 6. export: flat CSV for spreadsheets
//!
//! Each stage returns a summary with its audit lists; the caller decides
//! what to print.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::logic::alert::{ingest_raw_alerts, merge_batches, Label};
use crate::logic::dataset::{
    self, export_csv, read_lines, read_records, replace_records, write_json, write_records,
};
use crate::logic::error::{RejectedLine, TriageResult};
use crate::logic::evaluation::{evaluate as evaluate_records, EvaluationReport};
use crate::logic::orchestrator::{ClassificationOrchestrator, OrchestrationStats};
use crate::logic::reconcile::{reconcile, ReconcileReport};

// ===== OUTPUT NAMES =====

pub fn preprocess_output(dir: &Path, label: Label, ts: &str) -> PathBuf {
    dataset::stage_output(dir, 1, &format!("{}_alerts_preprocessed_{}.jsonl", label, ts))
}

pub fn merge_output(dir: &Path, ts: &str) -> PathBuf {
    dataset::stage_output(dir, 2, &format!("alerts_merged_{}.jsonl", ts))
}

pub fn classify_output(dir: &Path, ts: &str) -> PathBuf {
    dataset::stage_output(dir, 3, &format!("alerts_classified_{}.jsonl", ts))
}

/// Derived outputs sit next to their input
fn sibling(input: &Path, stage: u8, suffix: &str) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    dataset::stage_output(dir, stage, &format!("{}{}", dataset::file_stem(input), suffix))
}

pub fn postprocess_output(input: &Path) -> PathBuf {
    sibling(input, 4, "_postprocessed.jsonl")
}

pub fn report_output(input: &Path) -> PathBuf {
    sibling(input, 5, "_evaluation_report.json")
}

pub fn export_output(input: &Path) -> PathBuf {
    sibling(input, 6, ".csv")
}

// ===== SUMMARIES =====

#[derive(Debug, Serialize)]
pub struct PreprocessSummary {
    pub output: PathBuf,
    pub records: usize,
    pub duplicates: Vec<String>,
    pub rejected: Vec<RejectedLine>,
}

#[derive(Debug, Serialize)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub records: usize,
    pub duplicates: Vec<String>,
    pub rejected: Vec<RejectedLine>,
}

#[derive(Debug, Serialize)]
pub struct ClassifySummary {
    pub output: PathBuf,
    pub stats: OrchestrationStats,
    pub rejected: Vec<RejectedLine>,
}

#[derive(Debug, Serialize)]
pub struct PostprocessSummary {
    pub output: PathBuf,
    pub report: ReconcileReport,
    pub rejected: Vec<RejectedLine>,
}

#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub rows: usize,
}

// ===== STAGES =====

pub fn preprocess(input: &Path, label: Label, output: &Path) -> TriageResult<PreprocessSummary> {
    let lines = read_lines(input)?;
    let outcome = ingest_raw_alerts(lines, label);
    let records = write_records(output, &outcome.records)?;

    Ok(PreprocessSummary {
        output: output.to_path_buf(),
        records,
        duplicates: outcome.duplicates,
        rejected: outcome.rejected,
    })
}

pub fn merge(first: &Path, second: &Path, seed: Option<u64>, output: &Path) -> TriageResult<MergeSummary> {
    let first = read_records(first)?;
    let second = read_records(second)?;

    let mut rejected = first.rejected;
    rejected.extend(second.rejected);

    let outcome = merge_batches(first.records, second.records, seed);
    let records = write_records(output, &outcome.records)?;

    Ok(MergeSummary {
        output: output.to_path_buf(),
        records,
        duplicates: outcome.duplicates,
        rejected,
    })
}

/// Classify a batch. Passing a previous output as `input` resumes it.
///
/// The full batch is rewritten to `output` after every settled call, so an
/// interrupted run leaves a file that resumes without repeating calls.
pub async fn classify(
    input: &Path,
    output: &Path,
    orchestrator: &ClassificationOrchestrator,
) -> TriageResult<ClassifySummary> {
    let mut batch = read_records(input)?;
    let stats = orchestrator
        .run_with_checkpoint(&mut batch.records, |records| replace_records(output, records))
        .await?;

    replace_records(output, &batch.records)?;
    log::info!("Wrote {} records to {}", batch.records.len(), output.display());

    Ok(ClassifySummary {
        output: output.to_path_buf(),
        stats,
        rejected: batch.rejected,
    })
}

pub fn postprocess(input: &Path, output: &Path) -> TriageResult<PostprocessSummary> {
    let mut batch = read_records(input)?;
    let report = reconcile(&mut batch.records);
    write_records(output, &batch.records)?;

    Ok(PostprocessSummary {
        output: output.to_path_buf(),
        report,
        rejected: batch.rejected,
    })
}

/// Evaluate a reconciled batch, optionally writing the report as JSON
pub fn evaluate(input: &Path, report_path: Option<&Path>) -> TriageResult<EvaluationReport> {
    let batch = read_records(input)?;
    let report = evaluate_records(&batch.records);

    if let Some(path) = report_path {
        write_json(path, &report)?;
        log::info!("Evaluation report written to {}", path.display());
    }

    Ok(report)
}

pub fn export(input: &Path, output: &Path) -> TriageResult<ExportSummary> {
    let batch = read_records(input)?;
    let rows = export_csv(output, &batch.records)?;

    Ok(ExportSummary { output: output.to_path_buf(), rows })
}
