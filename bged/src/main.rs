use std::path::{Path, PathBuf};
use std::time::Duration;

use anstyle::{AnsiColor, Style};
use bpmn_ged::evaluation::batch::{
    average_csv_column, run_batch_evaluation, BatchEvaluationOptions, ComparisonRecord,
};
use bpmn_ged::{compare_graphs, import_bpmn_file, CostModelPreset, GEDSearchOptions};

const USAGE: &str = "Usage:
  bged compare <file1.bpmn> <file2.bpmn> [--graded] [--budget-ms N]
  bged batch <ground_truth_dir> <comparison_dir> [--output <csv>] [--graded] [--budget-ms N]
  bged average <results.csv> [--column <name>]

Options:
  --graded       Use the graded substitution cost preset (0 / 0.5 / 1) instead of unit costs
  --budget-ms N  Time budget per comparison in milliseconds (default: unbounded)
  --output PATH  CSV report path (default: evaluation_results/evaluation_results_<timestamp>.csv)
  --column NAME  CSV column to average (default: similarity)";

fn warning_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Yellow.into()))
}

fn error_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Red.into()))
}

fn fail(message: &str) -> i32 {
    let style = error_style();
    eprintln!("{style}Error: {message}{style:#}");
    1
}

/// Positional arguments and recognized flags of one subcommand invocation
#[derive(Debug, Default)]
struct ParsedArgs {
    positional: Vec<String>,
    graded: bool,
    budget: Option<Duration>,
    output: Option<PathBuf>,
    column: Option<String>,
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--graded" => parsed.graded = true,
            "--budget-ms" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--budget-ms requires a value".to_string())?;
                let millis: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid --budget-ms value: {value}"))?;
                parsed.budget = Some(Duration::from_millis(millis));
            }
            "--output" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--output requires a value".to_string())?;
                parsed.output = Some(PathBuf::from(value));
            }
            "--column" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--column requires a value".to_string())?;
                parsed.column = Some(value.clone());
            }
            _ if arg.starts_with("--") => return Err(format!("Unknown option: {arg}")),
            _ => parsed.positional.push(arg.clone()),
        }
    }
    Ok(parsed)
}

impl ParsedArgs {
    fn cost_preset(&self) -> CostModelPreset {
        if self.graded {
            CostModelPreset::GradedSubstitution
        } else {
            CostModelPreset::UnitUniform
        }
    }

    fn search_options(&self) -> GEDSearchOptions {
        GEDSearchOptions {
            time_budget: self.budget,
        }
    }
}

fn cmd_compare(args: &[String]) -> i32 {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => return fail(&e),
    };
    let [file1, file2] = parsed.positional.as_slice() else {
        eprintln!("{USAGE}");
        return 1;
    };

    let g1 = match import_bpmn_file(file1) {
        Ok(g) => g,
        Err(e) => return fail(&format!("{file1}: {e}")),
    };
    let g2 = match import_bpmn_file(file2) {
        Ok(g) => g,
        Err(e) => return fail(&format!("{file2}: {e}")),
    };

    match compare_graphs(&g1, &g2, &parsed.cost_preset(), &parsed.search_options()) {
        Ok(cmp) => {
            println!("Graph Edit Distance: {}", cmp.ged);
            println!("Relative Graph Edit Distance: {}", cmp.relative_ged);
            println!("Graph similarity: {}", cmp.similarity);
            if !cmp.exact {
                let style = warning_style();
                eprintln!(
                    "{style}Warning: time budget exhausted, the reported distance is an upper bound{style:#}"
                );
            }
            0
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn result_line(row: &ComparisonRecord) -> String {
    format!("Processed {} - Similarity: {}", row.filename, row.similarity)
}

fn default_output_csv() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    Path::new("evaluation_results").join(format!("evaluation_results_{timestamp}.csv"))
}

fn cmd_batch(args: &[String]) -> i32 {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => return fail(&e),
    };
    let [ground_truth_dir, comparison_dir] = parsed.positional.as_slice() else {
        eprintln!("{USAGE}");
        return 1;
    };

    let options = BatchEvaluationOptions {
        output_csv: parsed.output.clone().unwrap_or_else(default_output_csv),
        cost_preset: parsed.cost_preset(),
        search: parsed.search_options(),
    };

    let summary = match run_batch_evaluation(
        Path::new(ground_truth_dir),
        Path::new(comparison_dir),
        None,
        &options,
    ) {
        Ok(summary) => summary,
        Err(e) => return fail(&e.to_string()),
    };

    let warn = warning_style();
    for filename in &summary.skipped {
        eprintln!(
            "{warn}Warning: No matching file found for {filename} in comparison directory{warn:#}"
        );
    }
    // The batch runs to completion before anything is reported, so this is
    // a result listing, not live progress
    for row in &summary.rows {
        println!("{}", result_line(row));
    }
    let error = error_style();
    for failure in &summary.failures {
        eprintln!(
            "{error}Error processing {}: {}{error:#}",
            failure.filename, failure.error
        );
    }

    println!();
    println!(
        "Evaluation complete: {} processed, {} skipped, {} failed ({} candidate pairs)",
        summary.processed(),
        summary.skipped.len(),
        summary.failures.len(),
        summary.total_candidates
    );
    if let (Some(ged), Some(rged), Some(similarity)) = (
        summary.average_ged(),
        summary.average_rged(),
        summary.average_similarity(),
    ) {
        println!("Average GED: {ged:.5}");
        println!("Average RGED: {rged:.5}");
        println!("Average similarity: {similarity:.5}");
    }
    match &summary.output_csv {
        Some(path) => println!("Results saved to: {}", path.display()),
        None => println!("No results to save"),
    }
    0
}

fn cmd_average(args: &[String]) -> i32 {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => return fail(&e),
    };
    let [csv_path] = parsed.positional.as_slice() else {
        eprintln!("{USAGE}");
        return 1;
    };
    let column = parsed.column.as_deref().unwrap_or("similarity");

    match average_csv_column(Path::new(csv_path), column) {
        Ok((average, count)) => {
            println!("Average {column}: {average:.5} (from {count} rows)");
            0
        }
        Err(e) => fail(&e.to_string()),
    }
}


fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.first().map(String::as_str) {
        Some("compare") => cmd_compare(&args[1..]),
        Some("batch") => cmd_batch(&args[1..]),
        Some("average") => cmd_average(&args[1..]),
        _ => {
            eprintln!("{USAGE}");
            1
        }
    };
    std::process::exit(code);
}
