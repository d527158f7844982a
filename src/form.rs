use crate::models::{EvaluationRequest, JobRole, OTHER_ROLE_LABEL, Role};
use serde::Deserialize;

/// The three inputs collected before an evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewForm {
    pub question: String,
    /// `None` until a role has been selected
    pub job_role: Option<JobRole>,
    pub answer: String,
}

impl InterviewForm {
    #[cfg(test)]
    pub fn new(question: impl Into<String>, job_role: JobRole, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            job_role: Some(job_role),
            answer: answer.into(),
        }
    }

    /// Build the request if every field is non-blank after trimming.
    /// Invalid input is rejected silently: no error, no submission.
    pub fn submission(&self) -> Option<EvaluationRequest> {
        let question = non_blank(&self.question)?;
        let job_role = non_blank(self.job_role.as_ref()?.as_str())?;
        let answer = non_blank(&self.answer)?;

        Some(EvaluationRequest {
            question: question.to_string(),
            job_role: job_role.to_string(),
            answer: answer.to_string(),
        })
    }

    /// Submit the form. The submit control is disabled while an evaluation is in flight.
    pub fn submit(&self, in_flight: bool) -> Option<EvaluationRequest> {
        if in_flight {
            return None;
        }
        self.submission()
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Labels offered in the role picker, "Other" last
pub fn role_choices() -> Vec<&'static str> {
    Role::ALL
        .iter()
        .map(|role| role.label())
        .chain(std::iter::once(OTHER_ROLE_LABEL))
        .collect()
}

/// Form entry as written in a batch run file
#[derive(Debug, Clone, Deserialize)]
pub struct FormEntry {
    pub question: String,
    /// A role label, or "Other" to use `custom_job_role`
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub custom_job_role: Option<String>,
    pub answer: String,
}

impl FormEntry {
    /// Map the picker value to a tagged job role. An unknown label is
    /// kept as custom text so the service still sees what was typed.
    fn resolve_job_role(&self) -> Option<JobRole> {
        let selected = self.job_role.as_deref()?;
        if selected == OTHER_ROLE_LABEL {
            return Some(JobRole::Custom(
                self.custom_job_role.clone().unwrap_or_default(),
            ));
        }
        let role = Role::ALL.into_iter().find(|role| role.label() == selected);
        Some(match role {
            Some(role) => JobRole::Predefined(role),
            None => JobRole::Custom(selected.to_string()),
        })
    }
}

impl From<&FormEntry> for InterviewForm {
    fn from(entry: &FormEntry) -> Self {
        Self {
            question: entry.question.clone(),
            job_role: entry.resolve_job_role(),
            answer: entry.answer.clone(),
        }
    }
}
