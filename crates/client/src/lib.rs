//! Command-line client that plays a scripted match on the in-memory store.
pub mod config;
pub mod demo;
pub mod logging;

pub use config::ClientConfig;
pub use demo::{DemoReport, SeatReport, Step, run_demo, script};
pub use logging::setup_logging;
