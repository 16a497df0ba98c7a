//! D-PLACE Carneiro 6th edition converter - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dplace_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "dplace")]
#[command(version)]
#[command(about = "D-PLACE Carneiro 6th edition converter", long_about = None)]
struct Cli {
    /// Report errors as JSON lines on stderr
    #[arg(long, global = true)]
    json_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the raw export into value tables
    Makecldf {
        /// Raw data directory (containing 6TH_EDITION/)
        #[arg(long, default_value = "raw")]
        raw: PathBuf,

        /// Output directory
        #[arg(long, default_value = "cldf")]
        out: PathBuf,

        /// Correction tables (TOML) replacing the built-in ones
        #[arg(long)]
        tables: Option<PathBuf>,

        /// Print the N most frequent raw citation keys
        #[arg(long, value_name = "N")]
        ref_stats: Option<usize>,
    },

    /// Resolve every reference of the raw export without writing anything
    Check {
        /// Raw data directory (containing 6TH_EDITION/)
        #[arg(long, default_value = "raw")]
        raw: PathBuf,

        /// Correction tables (TOML) replacing the built-in ones
        #[arg(long)]
        tables: Option<PathBuf>,
    },

    /// Split reference fields into citation mentions
    Split {
        /// Reference fields, e.g. "Smith 1925: 12; 14; Jones 1930"
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dplace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    let result = match cli.command {
        Commands::Makecldf {
            raw,
            out,
            tables,
            ref_stats,
        } => commands::makecldf::execute(commands::makecldf::MakecldfArgs {
            raw,
            out,
            tables,
            ref_stats,
        }),
        Commands::Check { raw, tables } => commands::check::execute(&raw, tables.as_deref()),
        Commands::Split { fields } => commands::split::execute(&fields),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, json_errors);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &anyhow::Error, json_errors: bool) {
    let diagnostic: Option<DiagnosticMessage> =
        if let Some(e) = err.downcast_ref::<dplace_dataset::DatasetError>() {
            Some(e.to_diagnostic())
        } else {
            err.downcast_ref::<dplace_refs::Error>()
                .map(dplace_refs::Error::to_diagnostic)
        };

    match (diagnostic, json_errors) {
        (Some(diagnostic), true) => eprintln!("{}", diagnostic.to_json()),
        (Some(diagnostic), false) => eprintln!("{}", diagnostic.to_text()),
        (None, true) => {
            let diagnostic = DiagnosticMessageBuilder::error("Internal Error")
                .with_code("D-0-1")
                .problem(format!("{:#}", err))
                .build();
            eprintln!("{}", diagnostic.to_json());
        }
        (None, false) => eprintln!("Error: {:#}", err),
    }
}
