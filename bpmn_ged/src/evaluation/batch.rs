//! Pairwise evaluation of two directories of BPMN models
//!
//! A ground-truth directory is matched file-name by file-name against a
//! comparison directory (typically generated or modified variants of the
//! same processes). Matched pairs are compared independently on a rayon
//! worker pool; a single pair's failure is recorded and never aborts its
//! siblings. The aggregation is a plain accumulation over the completed
//! results, so completion order cannot affect the final summary.

use crate::ged::cost::CostModelPreset;
use crate::ged::search::GEDSearchOptions;
use crate::ged::similarity::compare_graphs;
use crate::model::import_bpmn::import_bpmn_file;
use crate::normalization::{normalize_graph_pair, LabelNormalizationProvider};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use std::path::{Path, PathBuf};

///
/// Error encountered while running a batch evaluation
///
#[derive(Debug)]
pub enum BatchEvaluationError {
    /// IO error (e.g., while listing directories)
    Io(std::io::Error),
    /// CSV error while writing or reading a report
    Csv(csv::Error),
    /// A given path is not a directory
    NotADirectory(PathBuf),
    /// A CSV report is missing the requested column
    MissingColumn(String),
    /// A CSV cell could not be parsed as a number
    InvalidValue {
        /// Column the cell belongs to
        column: String,
        /// The offending cell content
        value: String,
    },
    /// A CSV report contains no data rows to aggregate
    NoRows,
}

impl std::fmt::Display for BatchEvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchEvaluationError::Io(e) => write!(f, "IO error: {e}"),
            BatchEvaluationError::Csv(e) => write!(f, "CSV error: {e}"),
            BatchEvaluationError::NotADirectory(p) => {
                write!(f, "Not a directory: {}", p.display())
            }
            BatchEvaluationError::MissingColumn(c) => {
                write!(f, "Column '{c}' not found in CSV header")
            }
            BatchEvaluationError::InvalidValue { column, value } => {
                write!(f, "Could not parse '{value}' in column '{column}' as a number")
            }
            BatchEvaluationError::NoRows => write!(f, "No rows found to aggregate"),
        }
    }
}

impl std::error::Error for BatchEvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchEvaluationError::Io(e) => Some(e),
            BatchEvaluationError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BatchEvaluationError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for BatchEvaluationError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

///
/// Options for a batch evaluation run
///
/// The output location is an explicit value decided by the caller at
/// invocation time (the `bged` CLI derives a timestamped default), not an
/// environment-derived implicit.
///
#[derive(Debug, Clone)]
pub struct BatchEvaluationOptions {
    /// Path of the CSV report to write (parent directories are created)
    pub output_csv: PathBuf,
    /// Cost model preset used for every pair
    pub cost_preset: CostModelPreset,
    /// Search options (time budget) used for every pair
    pub search: GEDSearchOptions,
}

/// One CSV result row of a batch evaluation
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRecord {
    /// File name shared by the ground-truth and comparison model
    pub filename: String,
    /// Graph edit distance
    pub ged: f64,
    /// Relative GED, rounded to 5 decimals
    pub rged: f64,
    /// Similarity (`1 - rged`), rounded to 5 decimals
    pub similarity: f64,
}

/// A pair whose comparison failed (parse error, provider error, timeout without bound, ...)
#[derive(Debug, Clone, Serialize)]
pub struct PairFailure {
    /// File name of the failed pair
    pub filename: String,
    /// Human-readable failure cause
    pub error: String,
}

///
/// Aggregated outcome of a batch evaluation
///
/// Reconciliation invariant: `rows.len() + skipped.len() + failures.len()`
/// equals [`BatchEvaluationSummary::total_candidates`].
///
#[derive(Debug, Clone, Serialize)]
pub struct BatchEvaluationSummary {
    /// Number of ground-truth files considered
    pub total_candidates: usize,
    /// Successfully compared pairs, sorted by file name
    pub rows: Vec<ComparisonRecord>,
    /// Ground-truth files without a matching comparison file
    pub skipped: Vec<String>,
    /// Pairs whose comparison failed
    pub failures: Vec<PairFailure>,
    /// Path of the written CSV report (absent if there was nothing to write)
    pub output_csv: Option<PathBuf>,
}

impl BatchEvaluationSummary {
    /// Number of successfully compared pairs
    pub fn processed(&self) -> usize {
        self.rows.len()
    }

    /// Mean GED over the processed pairs
    pub fn average_ged(&self) -> Option<f64> {
        mean(self.rows.iter().map(|r| r.ged))
    }

    /// Mean relative GED over the processed pairs
    pub fn average_rged(&self) -> Option<f64> {
        mean(self.rows.iter().map(|r| r.rged))
    }

    /// Mean similarity over the processed pairs
    pub fn average_similarity(&self) -> Option<f64> {
        mean(self.rows.iter().map(|r| r.similarity))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn round5(x: f64) -> f64 {
    (x * 100_000.0).round() / 100_000.0
}

fn list_bpmn_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, BatchEvaluationError> {
    if !dir.is_dir() {
        return Err(BatchEvaluationError::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "bpmn") {
            files.push((entry.file_name().to_string_lossy().to_string(), path));
        }
    }
    files.sort();
    Ok(files)
}

fn evaluate_pair(
    filename: &str,
    ground_truth_path: &Path,
    comparison_path: &Path,
    provider: Option<&dyn LabelNormalizationProvider>,
    options: &BatchEvaluationOptions,
) -> Result<ComparisonRecord, PairFailure> {
    let fail = |e: String| PairFailure {
        filename: filename.to_string(),
        error: e,
    };
    let g1 = import_bpmn_file(ground_truth_path).map_err(|e| fail(e.to_string()))?;
    let g2 = import_bpmn_file(comparison_path).map_err(|e| fail(e.to_string()))?;
    let (g1, g2) = match provider {
        Some(provider) => {
            normalize_graph_pair(&g1, &g2, provider).map_err(|e| fail(e.to_string()))?
        }
        None => (g1, g2),
    };
    let cmp = compare_graphs(&g1, &g2, &options.cost_preset, &options.search)
        .map_err(|e| fail(e.to_string()))?;
    Ok(ComparisonRecord {
        filename: filename.to_string(),
        ged: cmp.ged,
        rged: round5(cmp.relative_ged),
        similarity: round5(cmp.similarity),
    })
}

///
/// Compare two directories of BPMN models pairwise and write a CSV report
///
/// Ground-truth `*.bpmn` files are matched by file name in the comparison
/// directory; unmatched files are recorded as skipped. Matched pairs are
/// evaluated in parallel, each worker parsing, optionally normalizing (when
/// a provider is given, one mapping per pair) and comparing with no shared
/// mutable state. The CSV report has the columns
/// `filename, ged, rged, similarity`.
///
pub fn run_batch_evaluation(
    ground_truth_dir: &Path,
    comparison_dir: &Path,
    provider: Option<&dyn LabelNormalizationProvider>,
    options: &BatchEvaluationOptions,
) -> Result<BatchEvaluationSummary, BatchEvaluationError> {
    if !comparison_dir.is_dir() {
        return Err(BatchEvaluationError::NotADirectory(
            comparison_dir.to_path_buf(),
        ));
    }
    let ground_truth_files = list_bpmn_files(ground_truth_dir)?;
    let total_candidates = ground_truth_files.len();

    let mut skipped = Vec::new();
    let mut pairs = Vec::new();
    for (filename, ground_truth_path) in ground_truth_files {
        let comparison_path = comparison_dir.join(&filename);
        if comparison_path.is_file() {
            pairs.push((filename, ground_truth_path, comparison_path));
        } else {
            skipped.push(filename);
        }
    }

    let outcomes: Vec<Result<ComparisonRecord, PairFailure>> = pairs
        .par_iter()
        .map(|(filename, ground_truth_path, comparison_path)| {
            evaluate_pair(filename, ground_truth_path, comparison_path, provider, options)
        })
        .collect();

    let mut rows = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(row) => rows.push(row),
            Err(failure) => failures.push(failure),
        }
    }
    rows.sort_by(|a, b| a.filename.cmp(&b.filename));
    failures.sort_by(|a, b| a.filename.cmp(&b.filename));

    let output_csv = if rows.is_empty() {
        None
    } else {
        if let Some(parent) = options.output_csv.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&options.output_csv)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Some(options.output_csv.clone())
    };

    Ok(BatchEvaluationSummary {
        total_candidates,
        rows,
        skipped,
        failures,
        output_csv,
    })
}

///
/// Average a numeric column of an existing CSV report
///
/// Returns the mean and the number of data rows.
///
pub fn average_csv_column(
    path: &Path,
    column: &str,
) -> Result<(f64, usize), BatchEvaluationError> {
    let mut reader = csv::Reader::from_path(path)?;
    let position = reader
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| BatchEvaluationError::MissingColumn(column.to_string()))?;
    let mut sum = 0.0;
    let mut count = 0usize;
    for record in reader.records() {
        let record = record?;
        let cell = record.get(position).unwrap_or("");
        let value: f64 = cell
            .parse()
            .map_err(|_| BatchEvaluationError::InvalidValue {
                column: column.to_string(),
                value: cell.to_string(),
            })?;
        sum += value;
        count += 1;
    }
    if count == 0 {
        return Err(BatchEvaluationError::NoRows);
    }
    Ok((sum / count as f64, count))
}
