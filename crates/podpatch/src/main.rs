//! podpatch CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "podpatch")]
#[command(version)]
#[command(about = "Merge partial override documents into pod templates", long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a changes document into a source document
    Merge {
        /// Source document (YAML or JSON, '-' for stdin)
        source: PathBuf,

        /// Changes document (YAML or JSON, '-' for stdin)
        changes: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, env = "PODPATCH_FORMAT", default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Read the result back as a pod template, dropping unknown fields
        #[arg(long)]
        typed: bool,

        /// Write output to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a patch template is set and reads as a pod template
    Check {
        /// Template file (YAML or JSON, '-' for stdin)
        template: PathBuf,

        /// Treat the file as a patch configuration with a `template` field
        #[arg(long)]
        config: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "podpatch=debug,podpatch_merge=debug,podpatch_template=debug"
    } else {
        "podpatch=info,podpatch_merge=info,podpatch_template=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Merge {
            source,
            changes,
            format,
            typed,
            output,
        } => commands::merge::execute(&commands::merge::MergeArgs {
            source,
            changes,
            format,
            typed,
            output,
        }),
        Commands::Check { template, config } => commands::check::execute(&template, config),
    }
}
