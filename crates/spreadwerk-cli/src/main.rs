// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spreadwerk — command-line front end.
//
// Entry point. Initialises logging, loads the layout configuration and runs
// the requested command. Page files are taken in the order given; sorting
// them is the caller's job.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spreadwerk_core::LayoutConfig;

#[derive(Parser)]
#[command(name = "spreadwerk")]
#[command(version, about = "Manga page pairing and cover selection", long_about = None)]
#[command(after_help = "EXAMPLES:
    spreadwerk pair ch1/01.png ch1/02.png ch1/03.png    Print two-up groups
    spreadwerk pair --json ch1/*.png                    Full layout as JSON
    spreadwerk cover ch1/*.png                          Pick a colour cover")]
struct Cli {
    /// Layout configuration file (JSON); missing keys use defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Partition a chapter's pages into one- and two-page groups
    Pair {
        /// Page images, already in reading order
        #[arg(value_name = "PAGE", required = true)]
        pages: Vec<String>,

        /// Print the full layout (groups, parity, per-page metrics) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pick the first colour page as a series cover
    Cover {
        /// Page images of the first chapter, already in reading order
        #[arg(value_name = "PAGE", required = true)]
        pages: Vec<String>,
    },
    /// Print per-page metrics and classes as JSON
    Metrics {
        /// Page images, already in reading order
        #[arg(value_name = "PAGE", required = true)]
        pages: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => LayoutConfig::default(),
    };

    let result = match cli.command {
        Command::Pair { pages, json } => commands::pair(config, pages, json),
        Command::Cover { pages } => commands::cover(config, pages),
        Command::Metrics { pages } => commands::metrics(config, pages),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
