//! Data-driven game definitions and their loaders.
//!
//! Game specs describe a board and its pieces and never change while a match
//! is running. They are authored as RON or TOML files:
//! - Game specs (`specs/{id}.ron` or `specs/{id}.toml`)
//! - Board configuration (`config.toml`)
//!
//! The [`SpecCatalog`] keeps every spec known to a client, keyed by id.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::SpecCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, GameSpecLoader, LoadResult, SpecFormat};
