//! DataFlow CLI library.
//!
//! This crate provides the command implementations for the `dataflow`
//! binary: one-shot generation commands, a dependency doctor, and the
//! local WebSocket generation service.

pub mod commands;
