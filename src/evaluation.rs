use crate::config::ClientConfig;
use crate::error::{EvaluationError, GENERIC_FAILURE};
use crate::models::{EvaluationRequest, EvaluationResult};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const EVALUATE_PATH: &str = "/api/evaluate";

/// Client for the external interview evaluation service
pub struct EvaluationClient {
    http: Client,
    endpoint: String,
}

impl EvaluationClient {
    /// Create a client for the configured service
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", config.base_url, EVALUATE_PATH),
        })
    }

    /// Full URL of the evaluate endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one evaluation request and validate the response.
    /// Every call is independent: no retries, caching or deduplication.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError> {
        debug!(url = %self.endpoint, job_role = %request.job_role, "Calling evaluation API");

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(EvaluationError::Transport)?;

        let status = response.status();
        debug!(status = %status, "Evaluation API responded");

        let body = response.text().await.map_err(EvaluationError::Transport)?;

        if !status.is_success() {
            let message = service_error_message(status, &body);
            warn!(status = status.as_u16(), %message, "Evaluation API returned an error");
            return Err(EvaluationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        parse_evaluation_response(&body)
    }
}

/// Pick the message to surface for a non-success response
fn service_error_message(status: StatusCode, body: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return GENERIC_FAILURE.to_string(),
    };

    match parsed.get("detail").and_then(Value::as_str) {
        Some(detail) if !detail.is_empty() => detail.to_string(),
        _ => format!("HTTP error! status: {}", status.as_u16()),
    }
}

/// Parse and validate a success body
fn parse_evaluation_response(body: &str) -> Result<EvaluationResult, EvaluationError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|_| EvaluationError::contract("expected a JSON object"))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| EvaluationError::contract("expected a JSON object"))?;

    Ok(EvaluationResult {
        overall_score: extract_score(object)?,
        strengths: extract_list(object, "strengths")?,
        weaknesses: extract_list(object, "weaknesses")?,
        improvement_tips: extract_list(object, "improvement_tips")?,
        improved_answer: extract_improved_answer(object)?,
    })
}

/// Extract `overall_score`. Zero is a valid score, only absence or null is missing.
fn extract_score(object: &Map<String, Value>) -> Result<f64, EvaluationError> {
    match object.get("overall_score") {
        None | Some(Value::Null) => Err(EvaluationError::contract("missing overall_score")),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| EvaluationError::contract("overall_score must be a number")),
    }
}

/// Extract a list of strings. An absent list is empty.
fn extract_list(object: &Map<String, Value>, field: &str) -> Result<Vec<String>, EvaluationError> {
    let items = match object.get(field) {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(EvaluationError::contract(format!("{field} must be an array")));
        }
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| EvaluationError::contract(format!("{field} must contain only strings")))
        })
        .collect()
}

fn extract_improved_answer(object: &Map<String, Value>) -> Result<String, EvaluationError> {
    match object.get("improved_answer").and_then(Value::as_str) {
        Some(answer) if !answer.is_empty() => Ok(answer.to_string()),
        _ => Err(EvaluationError::contract("missing improved_answer")),
    }
}
