//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use board_core::GameSpecId;
use match_runtime::RuntimeConfig;

/// Where content lives and which game to play.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub game_spec: GameSpecId,
    pub runtime: RuntimeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            game_spec: GameSpecId::new("demo"),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `TABLETOP_DATA_DIR`
    /// - `TABLETOP_GAME_SPEC`
    /// - runtime variables, see [`RuntimeConfig::from_env`]
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        if let Ok(dir) = env::var("TABLETOP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(spec) = env::var("TABLETOP_GAME_SPEC")
            && !spec.trim().is_empty()
        {
            config.game_spec = GameSpecId::new(spec.trim());
        }

        config
    }
}
