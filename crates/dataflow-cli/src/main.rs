//! DataFlow CLI - Command-line interface for data flow diagram generation
//!
//! This binary provides commands for turning a database/metadata dump into
//! an interactive data flow visualization, plus the local service the
//! desktop frontend talks to.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use dataflow_cli::commands;

/// DataFlow - Interactive Data Flow Diagram Generation
#[derive(Parser)]
#[command(name = "dataflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract graph data from a metadata dump and render it in one call
    Generate {
        /// Path to the metadata dump
        #[arg(short, long)]
        metadata: String,

        /// Write the rendered HTML to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Override the tool execution timeout, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Extract graph data only, for later re-rendering with `draw`
    Parse {
        /// Path to the metadata dump
        #[arg(short, long)]
        metadata: String,

        /// Write the graph payload JSON to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Override the tool execution timeout, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Render previously extracted graph data without re-extraction
    Draw {
        /// Path to a graph payload JSON file produced by `parse`
        #[arg(short, long)]
        data: String,

        /// Write the rendered HTML to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Override the tool execution timeout, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Check system dependencies and configuration
    Doctor,

    /// Start the local WebSocket generation service
    #[cfg(feature = "serve")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = commands::serve::DEFAULT_PORT)]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            metadata,
            output,
            json,
            timeout,
        } => commands::generate::run(&metadata, output.as_deref(), json, timeout),
        Commands::Parse {
            metadata,
            output,
            json,
            timeout,
        } => commands::parse::run(&metadata, output.as_deref(), json, timeout),
        Commands::Draw {
            data,
            output,
            json,
            timeout,
        } => commands::draw::run(&data, output.as_deref(), json, timeout),
        Commands::Doctor => commands::doctor::run(),
        #[cfg(feature = "serve")]
        Commands::Serve { port } => commands::serve::run(port),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
