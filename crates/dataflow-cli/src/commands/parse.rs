//! Parse command implementation
//!
//! Extraction only; the payload can be saved and re-rendered later with
//! `dataflow draw` without paying the extraction cost again.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::FlowOutput;
use super::{build_service, print_summary, report_error};

/// Run the parse command.
///
/// # Returns
/// Exit code: 0 on success, 1 on any failure
pub fn run(
    metadata: &str,
    output: Option<&str>,
    json: bool,
    timeout_secs: Option<u64>,
) -> Result<ExitCode> {
    let service = build_service(timeout_secs);

    match service.parse(metadata) {
        Ok(payload) => {
            if let Some(dest) = output {
                let text = serde_json::to_string_pretty(&payload)
                    .context("Failed to serialize graph payload")?;
                std::fs::write(dest, text).with_context(|| format!("Failed to write {dest}"))?;
            }

            if json {
                println!("{}", FlowOutput::success(Some(payload), None).to_json());
            } else {
                println!("{} parsed {metadata}", "ok".green());
                print_summary(&payload);
                match output {
                    Some(dest) => {
                        println!("  {} payload written to {dest}", "->".green());
                    }
                    None => {
                        println!(
                            "     {}",
                            "use --output to save the payload for a later draw".dimmed()
                        );
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_error(&e, json)),
    }
}
