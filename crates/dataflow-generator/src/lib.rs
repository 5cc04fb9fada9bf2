//! DataFlow Generation Orchestration
//!
//! This crate wraps the external `data-flow-generator` tool with the logic
//! that makes it safe to call from a service: finding (or installing) a
//! runnable command, spawning it without losing output or deadlocking on
//! pipe buffers, interpreting what it printed, and splitting expensive
//! graph extraction from cheap re-rendering.
//!
//! # Layers
//!
//! - [`resolver`]: finds `uvx` on the host, bootstraps it when missing,
//!   and falls back to an indirect Python launcher. Never fails; a bad
//!   descriptor surfaces at invocation time.
//! - [`invoker`]: spawns the tool, drains stdout and stderr concurrently,
//!   and enforces a deadline.
//! - [`interpret`]: locates the generated artifact in captured output via
//!   the [`interpret::PYVIS_HTML_MARKER`] contract.
//! - [`backend`]: the [`Generator`] trait with subprocess and in-process
//!   adapters.
//! - [`service`]: the `parse` / `draw` / `generate` facade callers use.
//!
//! # Example
//!
//! ```no_run
//! use dataflow_generator::GenerationService;
//!
//! let service = GenerationService::new();
//! let (payload, artifact) = service.generate("target/metadata.json")?;
//! println!("{} nodes -> {:?}", payload.stats.node_count, artifact.path());
//! # Ok::<(), dataflow_generator::GeneratorError>(())
//! ```

pub mod backend;
pub mod error;
pub mod interpret;
pub mod invoker;
pub mod resolver;
pub mod service;

// Re-export commonly used types at the crate root
pub use backend::{DirectGenerator, Generator, SubprocessGenerator};
pub use error::{GeneratorError, GeneratorResult};
pub use interpret::PYVIS_HTML_MARKER;
pub use invoker::{Invoker, InvokerConfig, DEFAULT_TIMEOUT_SECS};
pub use resolver::{
    InvocationDescriptor, Resolution, Resolver, ResolverConfig, PRIMARY_COMMAND, TOOL_PACKAGE_ID,
    TOOL_SUBCOMMAND,
};
pub use service::GenerationService;
