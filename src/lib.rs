//! Library crate for quoridor-back, exposing modules for binaries and integration tests.

/// Runtime configuration.
pub mod config;
/// Wire types for the WebSocket and HTTP surfaces.
pub mod dto;
/// Error taxonomy.
pub mod error;
/// HTTP and WebSocket routes.
pub mod routes;
/// Operations behind the routes.
pub mod services;
/// Authoritative in-memory state.
pub mod state;
