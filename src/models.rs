use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the "Other" entry in the role list; selecting it means the
/// free-text role is used instead.
pub const OTHER_ROLE_LABEL: &str = "Other";

/// Commonly interviewed-for job roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    SoftwareEngineer,
    ProductManager,
    DataScientist,
    UxDesigner,
    MarketingManager,
    SalesRepresentative,
    ProjectManager,
    BusinessAnalyst,
    DevopsEngineer,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::SoftwareEngineer,
        Role::ProductManager,
        Role::DataScientist,
        Role::UxDesigner,
        Role::MarketingManager,
        Role::SalesRepresentative,
        Role::ProjectManager,
        Role::BusinessAnalyst,
        Role::DevopsEngineer,
    ];

    /// Human-readable label, as sent to the evaluation service
    pub fn label(self) -> &'static str {
        match self {
            Role::SoftwareEngineer => "Software Engineer",
            Role::ProductManager => "Product Manager",
            Role::DataScientist => "Data Scientist",
            Role::UxDesigner => "UX Designer",
            Role::MarketingManager => "Marketing Manager",
            Role::SalesRepresentative => "Sales Representative",
            Role::ProjectManager => "Project Manager",
            Role::BusinessAnalyst => "Business Analyst",
            Role::DevopsEngineer => "DevOps Engineer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Job role chosen for an evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRole {
    /// One of the fixed roles
    Predefined(Role),
    /// Free text entered after choosing "Other"
    Custom(String),
}

impl JobRole {
    /// Resolve to the string sent on the wire (untrimmed)
    pub fn as_str(&self) -> &str {
        match self {
            JobRole::Predefined(role) => role.label(),
            JobRole::Custom(text) => text,
        }
    }
}

/// Body of `POST /api/evaluate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationRequest {
    pub question: String,
    pub job_role: String,
    pub answer: String,
}

/// Structured feedback returned by the evaluation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Overall score, expected within 0 to 10
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_tips: Vec<String>,
    /// Refined version of the candidate's answer, never empty
    pub improved_answer: String,
}

/// Outcome of one batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub question: String,
    pub job_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Count of results per score bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

/// Aggregates over a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub evaluated: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Mean overall score of the successful evaluations
    pub mean_score: Option<f64>,
    pub buckets: BucketCounts,
}

/// Final report of a batch run
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub outcomes: Vec<SubmissionOutcome>,
}
