//! Generate command implementation
//!
//! Extraction followed by rendering, as one call.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::FlowOutput;
use super::{build_service, print_artifact, print_summary, report_error, write_artifact};

/// Run the generate command.
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

    match service.generate(metadata) {
        Ok((payload, artifact)) => {
            let artifact = match output {
                Some(dest) => write_artifact(&artifact, dest)?,
                None => artifact,
            };

            if json {
                println!(
                    "{}",
                    FlowOutput::success(Some(payload), Some(artifact)).to_json()
                );
            } else {
                println!("{} generated data flow for {metadata}", "ok".green());
                print_summary(&payload);
                print_artifact(&artifact);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_error(&e, json)),
    }
}
