//! WebSocket generation service for the desktop frontend.
//!
//! This module provides a local WebSocket server that accepts generation
//! requests and returns the uniform JSON envelope. Each request runs on
//! its own blocking worker, so one request's subprocess wait never stalls
//! other connections.
//!
//! ## Protocol
//!
//! Requests are JSON objects with a `type` field:
//!
//! - `generate`: Extract and render in one round trip
//!   ```json
//!   {"type": "generate", "metadata_path": "/abs/path/to/metadata.json"}
//!   ```
//!
//! - `parse`: Extract graph data only
//!   ```json
//!   {"type": "parse", "metadata_path": "/abs/path/to/metadata.json"}
//!   ```
//!
//! - `draw`: Re-render a payload from an earlier parse
//!   ```json
//!   {"type": "draw", "payload": {"edges": [...], "node_types": {...}}}
//!   ```
//!
//! Responses are the standard FlowOutput JSON envelope.

mod handler;
mod types;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;

use dataflow_generator::{GenerationService, GeneratorError};

use crate::commands::json_output::FlowOutput;

pub use handler::handle_request;
pub use types::FlowRequest;

/// Default port, matching the original sidecar service.
pub const DEFAULT_PORT: u16 = 8000;

/// Run the WebSocket generation service.
///
/// # Arguments
/// * `port` - Port to listen on
///
/// # Returns
/// Exit code: 0 on clean shutdown, 1 on error
pub fn run(port: u16) -> Result<ExitCode> {
    // Build tokio runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move { run_server(port).await })
}

/// Run the WebSocket server (async entry point).
async fn run_server(port: u16) -> Result<ExitCode> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    eprintln!("DataFlow generation service listening on ws://{}", addr);
    eprintln!("Press Ctrl+C to shutdown");

    // One service for the whole server, so tool resolution is memoized
    // across requests.
    let service = Arc::new(GenerationService::new());

    // Create shutdown channel
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutdown_tx = Arc::new(shutdown_tx);

    // Set up SIGINT handler
    let shutdown_tx_clone = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            eprintln!("\nShutting down...");
            let _ = shutdown_tx_clone.send(());
        }
    });

    let mut shutdown_rx = shutdown_tx.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        eprintln!("New connection from {}", peer_addr);
                        let shutdown_rx = shutdown_tx.subscribe();
                        tokio::spawn(handle_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&service),
                            shutdown_rx,
                        ));
                    }
                    Err(e) => {
                        eprintln!("Accept error: {}", e);
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                eprintln!("Server shutdown complete");
                break;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    service: Arc<GenerationService>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed for {}: {}", peer_addr, e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg_opt = read.next() => {
                match msg_opt {
                    Some(Ok(msg)) => {
                        if let Some(response) = process_message(Arc::clone(&service), msg).await {
                            if let Err(e) = write.send(Message::Text(response)).await {
                                eprintln!("Send error for {}: {}", peer_addr, e);
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        eprintln!("Receive error for {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        // Connection closed
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                // Server shutting down
                let _ = write.send(Message::Close(None)).await;
                break;
            }
        }
    }

    eprintln!("Connection closed: {}", peer_addr);
}

/// Process a single WebSocket message and return a response.
async fn process_message(service: Arc<GenerationService>, msg: Message) -> Option<String> {
    match msg {
        Message::Text(text) => Some(respond(service, text).await),
        Message::Binary(data) => {
            // Try to parse binary as UTF-8 JSON
            match String::from_utf8(data) {
                Ok(text) => Some(respond(service, text).await),
                Err(_) => {
                    let err = GeneratorError::invalid_request(
                        "binary message must be valid UTF-8 JSON",
                    );
                    Some(FlowOutput::from_error(&err).to_json())
                }
            }
        }
        Message::Ping(_) | Message::Pong(_) => {
            // Handled automatically by tungstenite
            None
        }
        Message::Close(_) => {
            // Connection closing
            None
        }
        Message::Frame(_) => {
            // Raw frame, shouldn't happen in normal operation
            None
        }
    }
}

/// Runs one request on a blocking worker so the subprocess wait never
/// blocks the accept loop or other connections.
async fn respond(service: Arc<GenerationService>, text: String) -> String {
    tokio::task::spawn_blocking(move || handler::handle_request(&*service, &text))
        .await
        .unwrap_or_else(|e| {
            let err = GeneratorError::internal(format!("worker task failed: {e}"));
            FlowOutput::from_error(&err).to_json()
        })
}
