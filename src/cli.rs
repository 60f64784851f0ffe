//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Roadmapper - turn a course syllabus into a structured semester roadmap
#[derive(Parser)]
#[command(
    name = "roadmapper",
    about = "Turn a course syllabus into a structured semester roadmap",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Generate a roadmap from syllabus text
    Generate {
        /// Path to the syllabus text file, or '-' for stdin
        input: String,

        /// Pretty-print the roadmap JSON
        #[arg(long)]
        pretty: bool,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Print the model instruction built for a syllabus without calling the service
    Prompt {
        /// Path to the syllabus text file, or '-' for stdin
        input: String,
    },
}
