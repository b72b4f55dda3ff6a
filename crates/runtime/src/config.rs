//! Runtime configuration.
use std::env;

use board_core::BoardConfig;

/// Channel sizes and board behaviour for every session of a process.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Deliveries a subscriber may fall behind before it lags.
    pub subscription_buffer_size: usize,
    pub board: BoardConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            subscription_buffer_size: 64,
            board: BoardConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `TABLETOP_EVENT_BUFFER`
    /// - `TABLETOP_SUBSCRIPTION_BUFFER`
    /// - `TABLETOP_VALIDATE_KINDS`
    /// - `TABLETOP_CLAMP_COORDINATES`
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Applies environment overrides on top of `self`.
    pub fn overlay_env(mut self) -> Self {
        if let Some(capacity) = read_env::<usize>("TABLETOP_EVENT_BUFFER") {
            self.event_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("TABLETOP_SUBSCRIPTION_BUFFER") {
            self.subscription_buffer_size = capacity.max(1);
        }

        if let Some(enabled) = read_env_bool("TABLETOP_VALIDATE_KINDS") {
            self.board.validate_kinds = enabled;
        }

        if let Some(enabled) = read_env_bool("TABLETOP_CLAMP_COORDINATES") {
            self.board.clamp_coordinates = enabled;
        }

        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
