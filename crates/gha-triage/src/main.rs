//! Triage a failed GitHub Actions run and print an LLM-generated analysis.
//!
//! Reads the API key from the `OPENAI_API_KEY` environment variable. Needs
//! an authenticated `gh` CLI on the PATH for log access.
//!
//! # Examples
//!
//! ```sh
//! # Analyze a whole workflow run
//! gha-triage https://github.com/konveyor/ci/actions/runs/19353355807
//!
//! # Analyze one job, with a bigger log budget and a different model
//! gha-triage https://github.com/konveyor/ci/actions/runs/19353355807/job/55364349255 \
//!   --model gpt-4o --log-budget 60000
//!
//! # Print only, skip the report file
//! gha-triage <url> --no-save
//! ```
//!
//! The report goes to stdout; progress and diagnostics go to stderr via
//! `tracing` (tune with `RUST_LOG`, e.g. `RUST_LOG=gha_triage=debug`).

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gha_triage::api::{self, ChatRequest, Message, OpenAiClient};
use gha_triage::proposal::FixProposal;
use gha_triage::{github, prompt, report};

/// Triage a failed GitHub Actions run and print an LLM-generated analysis.
#[derive(Parser)]
#[command(name = "gha-triage")]
struct Cli {
    /// GitHub Actions workflow-run or job URL
    url: String,

    /// Model for the analysis call (default: OPENAI_MODEL env, then gpt-4o-mini)
    #[arg(long)]
    model: Option<String>,

    /// Character budget for the log portion of the prompt
    #[arg(long, default_value_t = prompt::DEFAULT_LOG_BUDGET)]
    log_budget: usize,

    /// Directory the report file is written to
    #[arg(long, default_value = ".")]
    output_dir: String,

    /// Print the report without writing a file
    #[arg(long)]
    no_save: bool,
}

async fn run(cli: &Cli) -> Result<(), String> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| "OPENAI_API_KEY environment variable is not set".to_string())?;

    let model = cli
        .model
        .clone()
        .or_else(|| std::env::var("OPENAI_MODEL").ok())
        .unwrap_or_else(|| api::DEFAULT_MODEL.to_string());
    info!("using model {model}");

    let workflow_run = github::fetch_workflow_run(&cli.url)
        .await
        .map_err(|e| format!("failed to fetch workflow data: {e}"))?;

    let prompt_text = prompt::build_analysis_prompt(&workflow_run, cli.log_budget);

    info!("analyzing failure with {model}");
    let client = OpenAiClient::new(api_key)?;
    let request = ChatRequest {
        model: model.clone(),
        messages: vec![
            Message::system(prompt::SYSTEM_PROMPT),
            Message::user(prompt_text),
        ],
        max_tokens: api::ANALYSIS_MAX_TOKENS,
        temperature: 0.7,
    };
    let completion = client
        .chat(&request)
        .await
        .map_err(|e| format!("failed to analyze failure: {e}"))?;
    let response = completion
        .content
        .ok_or_else(|| "empty response from completion API".to_string())?;

    let proposal = FixProposal::from_response(&response);
    let rendered = report::render_report(&workflow_run, &proposal, &model);

    println!("{rendered}");

    if !cli.no_save {
        match report::save_report(&rendered, Path::new(&cli.output_dir)) {
            Ok(path) => info!("report saved to {}", path.display()),
            Err(e) => warn!("failed to save report: {e}"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Diagnostics to stderr so the report on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
