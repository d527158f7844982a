use crate::models::{BatchReport, EvaluationResult, SubmissionOutcome};
use clap::ValueEnum;
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Width of the score progress bar, in cells
const BAR_WIDTH: usize = 10;

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Presentational classification of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBucket {
    Good,
    Fair,
    Poor,
}

impl ScoreBucket {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBucket::Good
        } else if score >= 6.0 {
            ScoreBucket::Fair
        } else {
            ScoreBucket::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBucket::Good => "good",
            ScoreBucket::Fair => "fair",
            ScoreBucket::Poor => "poor",
        }
    }

    pub fn color(self) -> Color {
        match self {
            ScoreBucket::Good => Color::Green,
            ScoreBucket::Fair => Color::Yellow,
            ScoreBucket::Poor => Color::Red,
        }
    }
}

/// Fill proportion of the score bar, in `0.0..=1.0`
pub fn progress_fraction(score: f64) -> f64 {
    score.clamp(0.0, 10.0) / 10.0
}

fn progress_bar(score: f64) -> String {
    let filled = (progress_fraction(score) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Score headline, e.g. `Overall Score: 7.5/10 [########--] (fair)`
fn score_line(score: f64) -> String {
    format!(
        "Overall Score: {:.1}/10 {} ({})",
        score,
        progress_bar(score),
        ScoreBucket::from_score(score).label()
    )
}

/// Render everything below the score headline
fn render_details(result: &EvaluationResult) -> String {
    let mut out = String::new();

    render_list(&mut out, "Strengths", "•", &result.strengths);
    render_list(&mut out, "Areas for Improvement", "•", &result.weaknesses);
    render_list(&mut out, "Improvement Tips", "→", &result.improvement_tips);

    let _ = writeln!(out, "Improved Answer");
    let _ = writeln!(out, "---------------");
    let _ = writeln!(out, "{}", result.improved_answer);
    out
}

fn render_list(out: &mut String, title: &str, marker: &str, items: &[String]) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
    if items.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for item in items {
        let _ = writeln!(out, "  {} {}", marker, item);
    }
    let _ = writeln!(out);
}

/// Render a result as plain, uncoloured text
pub fn render_plain(result: &EvaluationResult) -> String {
    format!("{}\n\n{}", score_line(result.overall_score), render_details(result))
}

/// Print a single evaluation result in the specified format
pub fn print_result(result: &EvaluationResult, format: OutputFormat) {
    match format {
        OutputFormat::Plain => {
            let bucket = ScoreBucket::from_score(result.overall_score);
            println!("{}", score_line(result.overall_score).color(bucket.color()).bold());
            println!();
            print!("{}", render_details(result));
        }
        OutputFormat::Json => print_json(result),
    }
}

/// Print the error that replaced the result
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print a batch report in the specified format
pub fn print_report(report: &BatchReport, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print!("{}", render_report_plain(report)),
        OutputFormat::Json => print_json(report),
    }
}

fn render_report_plain(report: &BatchReport) -> String {
    let mut out = String::new();

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let _ = writeln!(out, "=== Submission {} ===", i + 1);
        render_outcome(&mut out, outcome);
        let _ = writeln!(out);
    }

    let summary = &report.summary;
    let _ = writeln!(out, "📊 SUMMARY");
    let _ = writeln!(out, "----------");
    let _ = writeln!(
        out,
        "Evaluated: {}  Failed: {}  Skipped: {}",
        summary.evaluated, summary.failed, summary.skipped
    );
    match summary.mean_score {
        Some(mean) => {
            let _ = writeln!(out, "Mean score: {:.1}/10", mean);
        }
        None => {
            let _ = writeln!(out, "Mean score: n/a");
        }
    }
    let _ = writeln!(
        out,
        "Good: {}  Fair: {}  Poor: {}",
        summary.buckets.good, summary.buckets.fair, summary.buckets.poor
    );
    out
}

fn render_outcome(out: &mut String, outcome: &SubmissionOutcome) {
    let _ = writeln!(out, "Question: {}", outcome.question);
    let _ = writeln!(out, "Job role: {}", outcome.job_role);
    if let Some(result) = &outcome.result {
        let _ = writeln!(out, "{}", render_plain(result));
    }
    if let Some(error) = &outcome.error {
        let _ = writeln!(out, "Error: {}", error);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchSummary, BucketCounts};

    fn create_test_result(score: f64) -> EvaluationResult {
        EvaluationResult {
            overall_score: score,
            strengths: vec!["Clear structure".to_string(), "Uses STAR".to_string()],
            weaknesses: vec![],
            improvement_tips: vec!["Mention the outcome".to_string()],
            improved_answer: "In my last role I led...".to_string(),
        }
    }

    #[test]
    fn test_bucket_mapping() {
        assert_eq!(ScoreBucket::from_score(10.0), ScoreBucket::Good);
        assert_eq!(ScoreBucket::from_score(7.9), ScoreBucket::Fair);
        assert_eq!(ScoreBucket::from_score(5.9), ScoreBucket::Poor);
        assert_eq!(ScoreBucket::from_score(8.0), ScoreBucket::Good);
        assert_eq!(ScoreBucket::from_score(6.0), ScoreBucket::Fair);
        assert_eq!(ScoreBucket::from_score(0.0), ScoreBucket::Poor);
    }

    #[test]
    fn test_bucket_colors() {
        assert_eq!(ScoreBucket::Good.color(), Color::Green);
        assert_eq!(ScoreBucket::Fair.color(), Color::Yellow);
        assert_eq!(ScoreBucket::Poor.color(), Color::Red);
    }

    #[test]
    fn test_progress_fraction_is_clamped() {
        assert_eq!(progress_fraction(7.5), 0.75);
        assert_eq!(progress_fraction(0.0), 0.0);
        assert_eq!(progress_fraction(10.0), 1.0);
        assert_eq!(progress_fraction(-3.0), 0.0);
        assert_eq!(progress_fraction(14.0), 1.0);
    }

    #[test]
    fn test_progress_bar_cells() {
        assert_eq!(progress_bar(7.5), "[########--]");
        assert_eq!(progress_bar(0.0), "[----------]");
        assert_eq!(progress_bar(12.0), "[##########]");
    }

    #[test]
    fn test_render_plain() {
        let rendered = render_plain(&create_test_result(7.5));

        assert!(rendered.starts_with("Overall Score: 7.5/10 [########--] (fair)"));
        assert!(rendered.contains("  • Clear structure"));
        assert!(rendered.contains("Areas for Improvement\n---------------------\n  (none)"));
        assert!(rendered.contains("  → Mention the outcome"));
        assert!(rendered.ends_with("In my last role I led...\n"));
    }

    #[test]
    fn test_render_report_plain() {
        let report = BatchReport {
            summary: BatchSummary {
                evaluated: 1,
                failed: 1,
                skipped: 0,
                mean_score: Some(8.5),
                buckets: BucketCounts { good: 1, fair: 0, poor: 0 },
            },
            outcomes: vec![
                SubmissionOutcome {
                    question: "Q1".to_string(),
                    job_role: "Data Scientist".to_string(),
                    result: Some(create_test_result(8.5)),
                    error: None,
                },
                SubmissionOutcome {
                    question: "Q2".to_string(),
                    job_role: "Staff SRE".to_string(),
                    result: None,
                    error: Some("rate limited".to_string()),
                },
            ],
        };

        let rendered = render_report_plain(&report);
        assert!(rendered.contains("=== Submission 2 ==="));
        assert!(rendered.contains("Overall Score: 8.5/10"));
        assert!(rendered.contains("Error: rate limited"));
        assert!(rendered.contains("Evaluated: 1  Failed: 1  Skipped: 0"));
        assert!(rendered.contains("Mean score: 8.5/10"));
    }
}
