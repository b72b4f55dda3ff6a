//! Shared-store access for match sessions.
//!
//! The [`SyncGateway`] trait is the only way a session talks to the store.
//! [`InMemorySyncGateway`] backs local matches and tests.

pub mod documents;
mod error;
mod memory;
mod subscription;
mod traits;

pub use error::{GatewayError, Result};
pub use memory::InMemorySyncGateway;
pub use subscription::{Delivery, Subscription};
pub use traits::SyncGateway;
