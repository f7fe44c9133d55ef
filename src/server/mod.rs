//! Listener providers and the sequential accept loop.

pub mod endpoint;
pub mod listener;
pub mod local;
pub mod responder;
pub mod tunnel;

pub use endpoint::{Endpoint, ListenerProvider};
pub use local::{LocalEndpoint, LocalProvider};
pub use responder::{Responder, ResponderState};
pub use tunnel::{TunnelEndpoint, TunnelProvider};
