//! Command implementations for the dataflow CLI.

pub mod doctor;
pub mod draw;
pub mod generate;
pub mod json_output;
pub mod parse;

#[cfg(feature = "serve")]
pub mod serve;

use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;

use dataflow_generator::{
    GenerationService, GeneratorError, InvokerConfig, ResolverConfig, SubprocessGenerator,
};
use dataflow_graph::{GraphPayload, RenderArtifact, ServiceError};

use self::json_output::FlowOutput;

/// Builds the subprocess-backed service, honoring an optional per-run
/// timeout override.
pub(crate) fn build_service(timeout_secs: Option<u64>) -> GenerationService {
    let mut invoker = InvokerConfig::default();
    if let Some(secs) = timeout_secs {
        invoker = invoker.timeout_secs(secs);
    }
    GenerationService::with_backend(SubprocessGenerator::with_config(
        ResolverConfig::default(),
        invoker,
    ))
}

/// Reports a failed operation in the requested output mode and returns
/// the failure exit code.
pub(crate) fn report_error(err: &GeneratorError, json: bool) -> ExitCode {
    if json {
        println!("{}", FlowOutput::from_error(err).to_json());
    } else {
        eprintln!("{} {} [{}]", "error".red().bold(), err, err.code());
        if let Some(detail) = err.detail() {
            let detail = detail.trim();
            if !detail.is_empty() {
                eprintln!("{}", detail.dimmed());
            }
        }
    }
    ExitCode::from(1)
}

/// Prints a human-readable graph summary.
pub(crate) fn print_summary(payload: &GraphPayload) {
    println!(
        "  {} {} nodes, {} edges",
        "->".green(),
        payload.stats.node_count,
        payload.stats.edge_count
    );
    for (node_type, count) in &payload.stats.type_counts {
        println!("     {count} {}", node_type.as_str().dimmed());
    }
}

/// Prints where the rendered visualization ended up.
pub(crate) fn print_artifact(artifact: &RenderArtifact) {
    match artifact {
        RenderArtifact::File { path } => {
            println!("  {} visualization: {}", "->".green(), path.display());
        }
        RenderArtifact::Inline { html } => {
            println!(
                "  {} inline visualization ({} bytes)",
                "->".green(),
                html.len()
            );
        }
    }
}

/// Copies the rendered HTML to `dest` and returns the relocated artifact.
pub(crate) fn write_artifact(
    artifact: &RenderArtifact,
    dest: &str,
) -> anyhow::Result<RenderArtifact> {
    let html = artifact
        .read_html()
        .context("Failed to read rendered HTML")?;
    std::fs::write(dest, html).with_context(|| format!("Failed to write {dest}"))?;
    Ok(RenderArtifact::file(dest))
}
