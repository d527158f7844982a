use crate::config::BatchConfig;
use crate::form::InterviewForm;
use crate::models::{BatchReport, BatchSummary, EvaluationResult, SubmissionOutcome};
use crate::output::ScoreBucket;
use crate::session::{EvaluationState, Session};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Runs every submission of a batch through one session
pub struct Runner {
    config: BatchConfig,
    session: Session,
}

impl Runner {
    pub fn new(config: BatchConfig, session: Session) -> Self {
        Self { config, session }
    }

    /// Evaluate all submissions in order. A failed evaluation is recorded and the batch continues.
    pub async fn run(&mut self) -> Result<BatchReport> {
        let entries = self.config.submissions.clone();
        let total = entries.len();
        let mut outcomes = Vec::new();
        let mut skipped = 0;

        for (index, entry) in entries.iter().enumerate() {
            let form = InterviewForm::from(entry);
            debug!("Processing submission {}/{}", index + 1, total);

            if !self.session.submit(&form).await {
                warn!("Skipping submission {}/{}: question, job role and answer are required", index + 1, total);
                skipped += 1;
                continue;
            }

            outcomes.push(self.record_outcome(&form));
        }

        let summary = summarize(&outcomes, skipped);
        let report = BatchReport { summary, outcomes };

        self.store_report_if_configured(&report)?;

        Ok(report)
    }

    fn record_outcome(&self, form: &InterviewForm) -> SubmissionOutcome {
        let job_role = form
            .job_role
            .as_ref()
            .map(|role| role.as_str().trim().to_string())
            .unwrap_or_default();

        let (result, error) = match self.session.state() {
            EvaluationState::Loaded(result) => (Some(result.clone()), None),
            EvaluationState::Error(message) => (None, Some(message.clone())),
            EvaluationState::Idle | EvaluationState::Loading => (None, None),
        };

        SubmissionOutcome {
            question: form.question.trim().to_string(),
            job_role,
            result,
            error,
        }
    }

    fn store_report_if_configured(&self, report: &BatchReport) -> Result<()> {
        if let Some(storage_path) = &self.config.storage_path {
            store_report(report, storage_path)?;
        }
        Ok(())
    }
}

/// Aggregate counts, mean score and buckets over the outcomes
pub fn summarize(outcomes: &[SubmissionOutcome], skipped: usize) -> BatchSummary {
    let results: Vec<&EvaluationResult> = outcomes.iter().filter_map(|o| o.result.as_ref()).collect();

    let mut summary = BatchSummary {
        evaluated: results.len(),
        failed: outcomes.len() - results.len(),
        skipped,
        ..Default::default()
    };

    if !results.is_empty() {
        let sum: f64 = results.iter().map(|r| r.overall_score).sum();
        summary.mean_score = Some(sum / results.len() as f64);
    }

    for result in results {
        match ScoreBucket::from_score(result.overall_score) {
            ScoreBucket::Good => summary.buckets.good += 1,
            ScoreBucket::Fair => summary.buckets.fair += 1,
            ScoreBucket::Poor => summary.buckets.poor += 1,
        }
    }

    summary
}

/// Store a report to a JSON file, creating parent directories
fn store_report(report: &BatchReport, path: &str) -> Result<()> {
    let json_content =
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, json_content)
        .with_context(|| format!("Failed to write report to: {}", path))?;
    info!("Report stored to: {}", path);

    Ok(())
}
