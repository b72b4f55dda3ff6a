//! Public runtime API surface.
//!
//! Error types shared by every runtime component live here so the gateway,
//! session and event layers agree on a single `Result`.

pub mod errors;

pub use errors::{GatewayError, Result, RuntimeError};
