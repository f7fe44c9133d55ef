//! Tunnel Responder - minimal sequential HTTP responder
//!
//! Accepts one connection at a time from a local TCP listener or an ngrok
//! tunnel, answers every request with the same fixed response, and closes.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
