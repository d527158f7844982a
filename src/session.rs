use crate::evaluation::EvaluationClient;
use crate::form::InterviewForm;
use crate::models::EvaluationResult;
use tracing::{error, info};

/// What the user currently sees
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EvaluationState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Loaded(EvaluationResult),
}

impl EvaluationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, EvaluationState::Loading)
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            EvaluationState::Loaded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EvaluationState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Drives a form through the evaluation client and keeps the visible state
pub struct Session {
    client: EvaluationClient,
    state: EvaluationState,
}

impl Session {
    pub fn new(client: EvaluationClient) -> Self {
        Self {
            client,
            state: EvaluationState::Idle,
        }
    }

    pub fn state(&self) -> &EvaluationState {
        &self.state
    }

    /// Submit a form. Returns `false` without touching the state when the
    /// form is rejected locally or an evaluation is already in flight.
    /// Otherwise the previous result is discarded and replaced by the outcome.
    ///
    /// Dropping the returned future cancels the request and resets the state to idle.
    pub async fn submit(&mut self, form: &InterviewForm) -> bool {
        let Some(request) = form.submit(self.state.is_loading()) else {
            return false;
        };

        let client = &self.client;
        let flight = InFlight::start(&mut self.state);
        let outcome = match client.evaluate(&request).await {
            Ok(result) => {
                info!(score = result.overall_score, "Evaluation completed");
                EvaluationState::Loaded(result)
            }
            Err(err) => {
                error!(error = %err, status = ?err.status(), "Evaluation error");
                EvaluationState::Error(err.to_string())
            }
        };
        flight.finish(outcome);
        true
    }
}

/// Holds the state in `Loading` for the duration of one request
struct InFlight<'a> {
    state: &'a mut EvaluationState,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a mut EvaluationState) -> Self {
        *state = EvaluationState::Loading;
        Self { state }
    }

    fn finish(self, outcome: EvaluationState) {
        *self.state = outcome;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            *self.state = EvaluationState::Idle;
        }
    }
}
