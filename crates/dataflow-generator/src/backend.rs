//! Generator collaborator adapters.
//!
//! One interface, two implementations: [`SubprocessGenerator`] runs the
//! external tool through the resolver/invoker pipeline, and
//! [`DirectGenerator`] adapts an in-process collaborator (two plain
//! functions). The generation service is written against the trait and
//! does not know which mode is configured.

use std::io::Write;
use std::path::Path;

use dataflow_graph::{GraphPayload, RenderArtifact};

use crate::error::{GeneratorError, GeneratorResult};
use crate::interpret;
use crate::invoker::{build_argv, Invoker, InvokerConfig, RawInvocation};
use crate::resolver::{Resolver, ResolverConfig};

/// The collaborator interface the generation service orchestrates.
///
/// `parse` is the expensive extraction phase; `draw` renders a payload the
/// caller already holds. The service composes the two for `generate`.
pub trait Generator: Send + Sync {
    /// Extracts graph data from the metadata dump at `metadata_path`.
    fn parse(&self, metadata_path: &Path) -> GeneratorResult<GraphPayload>;

    /// Renders previously extracted graph data.
    fn draw(&self, payload: &GraphPayload) -> GeneratorResult<RenderArtifact>;
}

/// Runs the generator tool as an external process.
pub struct SubprocessGenerator {
    resolver: Resolver,
    invoker: Invoker,
}

impl SubprocessGenerator {
    /// Creates a subprocess generator with default configuration.
    pub fn new() -> Self {
        Self {
            resolver: Resolver::new(),
            invoker: Invoker::new(),
        }
    }

    /// Creates a subprocess generator with explicit resolver and invoker
    /// configuration.
    pub fn with_config(resolver: ResolverConfig, invoker: InvokerConfig) -> Self {
        Self {
            resolver: Resolver::with_config(resolver),
            invoker: Invoker::with_config(invoker),
        }
    }

    /// Resolves, invokes, and re-resolves once if the resolved command
    /// turned out not to exist (stale memoized descriptor).
    fn run_phase(&self, phase_args: &[String]) -> GeneratorResult<RawInvocation> {
        let resolution = self.resolver.resolve();
        let argv = build_argv(
            &resolution.descriptor,
            self.invoker.config().refresh,
            phase_args,
        );

        match self.invoker.invoke(&argv) {
            Ok(raw) => Ok(raw),
            Err(e) if e.is_not_found() => {
                self.resolver.invalidate();
                let resolution = self.resolver.resolve();
                let argv = build_argv(
                    &resolution.descriptor,
                    self.invoker.config().refresh,
                    phase_args,
                );
                match self.invoker.invoke(&argv) {
                    Ok(raw) => Ok(raw),
                    Err(e) if e.is_not_found() => Err(GeneratorError::ToolUnavailable {
                        attempts: resolution.attempts,
                    }),
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like `run_phase`, but a non-zero exit becomes `ToolExecutionFailed`.
    fn run_phase_checked(&self, phase_args: &[String]) -> GeneratorResult<RawInvocation> {
        let raw = self.run_phase(phase_args)?;
        if !raw.success() {
            return Err(GeneratorError::execution_failed(raw.exit_code, raw.stderr));
        }
        Ok(raw)
    }
}

impl Default for SubprocessGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SubprocessGenerator {
    fn parse(&self, metadata_path: &Path) -> GeneratorResult<GraphPayload> {
        // The tool writes the payload JSON to a file we name, a structured
        // channel that keeps stdout free for its own logging.
        let data_out = tempfile::Builder::new()
            .prefix("dataflow_payload_")
            .suffix(".json")
            .tempfile()?;

        let raw = self.run_phase_checked(&[
            "-m".to_string(),
            metadata_path.display().to_string(),
            "--data-out".to_string(),
            data_out.path().display().to_string(),
        ])?;

        let text = std::fs::read_to_string(data_out.path()).unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GeneratorError::OutputUnparseable { stdout: raw.stdout });
        }
        serde_json::from_str(&text)
            .map_err(|_| GeneratorError::OutputUnparseable { stdout: raw.stdout })
    }

    fn draw(&self, payload: &GraphPayload) -> GeneratorResult<RenderArtifact> {
        let mut data_in = tempfile::Builder::new()
            .prefix("dataflow_data_")
            .suffix(".json")
            .tempfile()?;
        let json = serde_json::to_string(payload)?;
        data_in.write_all(json.as_bytes())?;
        data_in.flush()?;

        let raw = self.run_phase_checked(&[
            "--data-in".to_string(),
            data_in.path().display().to_string(),
        ])?;

        interpret::interpret(&raw.stdout)
    }
}

/// Adapts an in-process collaborator: one function that extracts graph
/// data from a metadata path and one that renders a payload to an HTML
/// document. The rendered document comes back inline rather than as a
/// file path.
pub struct DirectGenerator<P, D>
where
    P: Fn(&Path) -> GeneratorResult<GraphPayload> + Send + Sync,
    D: Fn(&GraphPayload) -> GeneratorResult<String> + Send + Sync,
{
    parse_fn: P,
    draw_fn: D,
}

impl<P, D> DirectGenerator<P, D>
where
    P: Fn(&Path) -> GeneratorResult<GraphPayload> + Send + Sync,
    D: Fn(&GraphPayload) -> GeneratorResult<String> + Send + Sync,
{
    /// Creates a direct generator from the collaborator's two functions.
    pub fn new(parse_fn: P, draw_fn: D) -> Self {
        Self { parse_fn, draw_fn }
    }
}

impl<P, D> Generator for DirectGenerator<P, D>
where
    P: Fn(&Path) -> GeneratorResult<GraphPayload> + Send + Sync,
    D: Fn(&GraphPayload) -> GeneratorResult<String> + Send + Sync,
{
    fn parse(&self, metadata_path: &Path) -> GeneratorResult<GraphPayload> {
        (self.parse_fn)(metadata_path)
    }

    fn draw(&self, payload: &GraphPayload) -> GeneratorResult<RenderArtifact> {
        (self.draw_fn)(payload).map(RenderArtifact::inline)
    }
}
