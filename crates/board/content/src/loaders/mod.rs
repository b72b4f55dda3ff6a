//! File loaders for board content.
//!
//! A data directory holds `config.toml` and one file per game spec under
//! `specs/`, in RON or TOML.

pub mod config;
pub mod factory;
pub mod spec;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use spec::{GameSpecLoader, SpecFormat};

use std::path::Path;

use anyhow::Context;

pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
