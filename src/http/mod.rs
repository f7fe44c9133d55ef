//! Fixed-response HTTP plumbing.
//!
//! This layer never parses requests. It holds the bytes a client sent for
//! logging and writes a pre-formed response back.
//!
//! - **`buffer`**: Fixed-capacity request buffer reused across connections
//! - **`response`**: Response builder and the immutable response payload
//! - **`writer`**: Serializes responses and writes payloads to a connection
//!
//! # Per-connection flow
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read, result only logged
//!        └──────┬──────┘
//!               │ data, EOF or error
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Fixed payload, written in full
//!        └──────┬───────────┘
//!               │
//!               ▼
//!        ┌──────────────────┐
//!        │    Closed        │ ← Always, on every path
//!        └──────────────────┘
//! ```

pub mod buffer;
pub mod response;
pub mod writer;
