use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, warn};

mod config;
mod error;
mod evaluation;
mod form;
mod models;
mod output;
mod runner;
mod session;

use crate::config::{API_URL_ENV, BatchConfig, ClientConfig, DEFAULT_API_URL};
use crate::evaluation::EvaluationClient;
use crate::form::{InterviewForm, role_choices};
use crate::models::{JobRole, Role};
use crate::output::OutputFormat;
use crate::runner::Runner;
use crate::session::Session;

/// Interview Answer Evaluator - Get structured feedback on interview answers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the evaluation service
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Output format: plain or json
    #[arg(short, long, global = true, default_value = "plain")]
    output: OutputFormat,

    /// Verbose output - log each API request
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a single interview answer
    Evaluate(EvaluateArgs),
    /// Evaluate every submission listed in a TOML run file
    Batch {
        /// Path to the TOML run file
        run_file: PathBuf,
    },
    /// List the selectable job roles
    Roles,
}

#[derive(ClapArgs, Debug)]
struct EvaluateArgs {
    /// The interview question
    #[arg(short, long, conflicts_with = "question_file", required_unless_present = "question_file")]
    question: Option<String>,

    /// Read the question from a file ("-" for stdin)
    #[arg(long)]
    question_file: Option<PathBuf>,

    /// Job role being interviewed for
    #[arg(short, long, value_enum, conflicts_with = "custom_role")]
    role: Option<Role>,

    /// Any other job role, as free text
    #[arg(long)]
    custom_role: Option<String>,

    /// Your answer to the question
    #[arg(short, long, conflicts_with = "answer_file", required_unless_present = "answer_file")]
    answer: Option<String>,

    /// Read the answer from a file ("-" for stdin)
    #[arg(long)]
    answer_file: Option<PathBuf>,
}

impl EvaluateArgs {
    fn into_form(self) -> Result<InterviewForm> {
        let question = text_or_file(self.question, self.question_file.as_deref())?;
        let answer = text_or_file(self.answer, self.answer_file.as_deref())?;
        let job_role = match (self.role, self.custom_role) {
            (Some(role), _) => Some(JobRole::Predefined(role)),
            (None, Some(text)) => Some(JobRole::Custom(text)),
            (None, None) => None,
        };

        Ok(InterviewForm {
            question,
            job_role,
            answer,
        })
    }
}

fn text_or_file(text: Option<String>, path: Option<&Path>) -> Result<String> {
    match (text, path) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) if path == Path::new("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

/// How a single evaluation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The result was printed
    Shown,
    /// Input failed local validation; nothing was sent
    Rejected,
    /// The evaluation failed and its message was printed
    Failed,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Shown => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::from(2),
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

/// Submit the form and show whatever the session ends up holding
async fn run_evaluate(session: &mut Session, form: &InterviewForm, format: OutputFormat) -> Outcome {
    if !session.submit(form).await {
        warn!("Question, job role and answer are all required");
        return Outcome::Rejected;
    }

    let state = session.state();
    if let Some(message) = state.error() {
        output::print_error(message);
        return Outcome::Failed;
    }
    if let Some(result) = state.result() {
        output::print_result(result, format);
    }
    Outcome::Shown
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let timeout = args.timeout_secs.map(Duration::from_secs);

    match args.command {
        Command::Roles => {
            for role in role_choices() {
                println!("{}", role);
            }
        }
        Command::Evaluate(evaluate_args) => {
            let form = evaluate_args.into_form()?;
            let client = EvaluationClient::new(&ClientConfig::new(args.api_url, timeout))?;
            debug!(endpoint = client.endpoint(), "Using evaluation service");
            let mut session = Session::new(client);

            let outcome = run_evaluate(&mut session, &form, args.output).await;
            return Ok(outcome.exit_code());
        }
        Command::Batch { run_file } => {
            let batch = BatchConfig::from_file(&run_file)?;
            let base_url = batch.api_url.clone().unwrap_or(args.api_url);
            let client = EvaluationClient::new(&ClientConfig::new(base_url, timeout))?;

            let mut runner = Runner::new(batch, Session::new(client));
            let report = runner.run().await?;

            output::print_report(&report, args.output);
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EvaluationState;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse_evaluate(extra: &[&str]) -> EvaluateArgs {
        let argv = ["interview-eval", "evaluate"].iter().chain(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Command::Evaluate(evaluate_args) => evaluate_args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn session_for(server: &mockito::ServerGuard) -> Session {
        let config = ClientConfig::new(server.url(), None);
        Session::new(EvaluationClient::new(&config).unwrap())
    }

    #[test]
    fn test_role_flag_maps_to_predefined() {
        let form = parse_evaluate(&["-q", "Why us?", "-r", "devops-engineer", "-a", "Uptime."])
            .into_form()
            .unwrap();

        assert_eq!(form.question, "Why us?");
        assert_eq!(form.job_role, Some(JobRole::Predefined(Role::DevopsEngineer)));
        assert_eq!(form.answer, "Uptime.");
    }

    #[test]
    fn test_custom_role_flag_maps_to_custom() {
        let form = parse_evaluate(&["-q", "Q", "--custom-role", "Staff SRE", "-a", "A"])
            .into_form()
            .unwrap();

        assert_eq!(form.job_role, Some(JobRole::Custom("Staff SRE".to_string())));
    }

    #[test]
    fn test_missing_role_leaves_role_unset() {
        let form = parse_evaluate(&["-q", "Q", "-a", "A"]).into_form().unwrap();
        assert!(form.job_role.is_none());
        assert!(form.submission().is_none());
    }

    #[test]
    fn test_role_and_custom_role_conflict() {
        let parsed = Args::try_parse_from([
            "interview-eval",
            "evaluate",
            "-q",
            "Q",
            "-r",
            "ux-designer",
            "--custom-role",
            "Barista",
            "-a",
            "A",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_answer_read_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "I shipped the migration on time.\n").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let form = parse_evaluate(&["-q", "Q", "-r", "data-scientist", "--answer-file", path])
            .into_form()
            .unwrap();

        assert_eq!(form.answer, "I shipped the migration on time.\n");
    }

    #[test]
    fn test_missing_answer_file_is_an_error() {
        let err = text_or_file(None, Some(Path::new("/nonexistent/answer.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_inline_text_wins_over_path() {
        let text = text_or_file(Some("inline".to_string()), Some(Path::new("-"))).unwrap();
        assert_eq!(text, "inline");
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_quietly() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/evaluate")
            .expect(0)
            .create_async()
            .await;

        let form = parse_evaluate(&["-q", "Why us?", "-r", "software-engineer", "-a", "   "])
            .into_form()
            .unwrap();
        let mut session = session_for(&server);

        let outcome = run_evaluate(&mut session, &form, OutputFormat::Plain).await;

        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(session.state(), &EvaluationState::Idle);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_service_failure_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/evaluate")
            .with_status(500)
            .with_body(r#"{"detail": "rate limited"}"#)
            .create_async()
            .await;

        let form = parse_evaluate(&["-q", "Q", "-r", "product-manager", "-a", "A"])
            .into_form()
            .unwrap();
        let mut session = session_for(&server);

        let outcome = run_evaluate(&mut session, &form, OutputFormat::Plain).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(session.state().error(), Some("rate limited"));
    }

    #[tokio::test]
    async fn test_successful_evaluation_is_shown() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/evaluate")
            .with_status(200)
            .with_body(r#"{"overall_score": 0, "improved_answer": "x"}"#)
            .create_async()
            .await;

        let form = parse_evaluate(&["-q", "Q", "-r", "business-analyst", "-a", "A"])
            .into_form()
            .unwrap();
        let mut session = session_for(&server);

        let outcome = run_evaluate(&mut session, &form, OutputFormat::Json).await;

        assert_eq!(outcome, Outcome::Shown);
        assert_eq!(session.state().result().unwrap().overall_score, 0.0);
    }
}
