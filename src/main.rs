//! Roadmapper CLI entry point
//!
//! Reads syllabus text, runs the extraction pipeline, and prints the
//! roadmap JSON to stdout. Logs and warnings go to stderr; each fatal error
//! classification maps to a distinct exit code so scripts can tell "try
//! again later" from "input or configuration is wrong".

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{error, info, warn};

use roadmapper::cli::{Cli, Command};
use roadmapper::config::Config;
use roadmapper::llm::create_client;
use roadmapper::roadmap::{PipelineError, RoadmapPipeline, build_instruction};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    // stdout carries the roadmap JSON; everything else goes to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

/// Map each error classification to a distinct exit code
fn exit_code(err: &PipelineError) -> u8 {
    match err {
        PipelineError::Configuration(_) => 2,
        PipelineError::Service(e) if e.is_retryable() => 3,
        PipelineError::Service(_) => 4,
        PipelineError::Extraction { .. } => 5,
        PipelineError::Validation(_) => 6,
    }
}

fn read_input(input: &str) -> Result<String, PipelineError> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| PipelineError::Configuration(format!("could not read stdin: {e}")))?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| PipelineError::Configuration(format!("could not read {input}: {e}")))?
    };

    if text.trim().is_empty() {
        return Err(PipelineError::Configuration("syllabus text is required".to_string()));
    }

    Ok(text)
}

async fn run(cli: Cli) -> Result<(), PipelineError> {
    let config = Config::load(cli.config.as_ref()).map_err(|e| PipelineError::Configuration(format!("{e:#}")))?;

    match cli.command {
        Command::Prompt { input } => {
            let text = read_input(&input)?;
            println!("{}", build_instruction(&text));
            Ok(())
        }
        Command::Generate { input, pretty, model } => {
            let text = read_input(&input)?;

            let mut llm_config = config.llm.clone();
            if let Some(model) = model {
                llm_config.model = model;
            }

            // Credential check happens here, before any network attempt
            let client = create_client(&llm_config)?;
            let pipeline = RoadmapPipeline::new(client, config.pipeline.clone());

            info!(model = %llm_config.model, input_chars = text.len(), "generating roadmap");
            let result = pipeline.generate(&text).await?;

            for warning in &result.warnings {
                warn!("{warning}");
            }
            info!(
                input_tokens = result.usage.input_tokens,
                output_tokens = result.usage.output_tokens,
                warnings = result.warnings.len(),
                "roadmap generated"
            );

            let json = if pretty {
                serde_json::to_string_pretty(&result.roadmap)
            } else {
                serde_json::to_string(&result.roadmap)
            }
            .map_err(|e| PipelineError::Validation(format!("could not serialize roadmap: {e}")))?;
            println!("{json}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose).context("Failed to setup logging") {
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(classification = err.classification(), "{err}");
            eprintln!("error ({}): {err}", err.classification());
            ExitCode::from(exit_code(&err))
        }
    }
}
