//! HTTP protocol implementation.
//!
//! A from-scratch HTTP/1.1 server layer: one request and one response per
//! connection, no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: Drives a single exchange through its state machine
//! - **`parser`**: Parses requests from byte buffers, including chunked bodies
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses with fixed-length or chunked framing
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a complete request (read timeout applies)
//!        └──────┬──────┘
//!               │ Request parsed          │ Parse failure
//!               ▼                         │
//!        ┌──────────────────┐             │
//!        │   Processing     │ ← Route     │
//!        └──────┬───────────┘             │
//!               │ Response ready          │ Empty error response
//!               ▼                         │
//!        ┌──────────────────┐             │
//!        │    Writing       │ ◄───────────┘
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!             Closed
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
