//! Content factory for loading specs and configuration from a data directory.

use std::path::{Path, PathBuf};

use board_core::{BoardConfig, GameSpec, GameSpecId};

use crate::catalog::SpecCatalog;
use crate::loaders::{ConfigLoader, GameSpecLoader, LoadResult, SpecFormat};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── specs/
///     ├── solitaire.ron
///     └── backgammon.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load board configuration from `config.toml`, or defaults when the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<BoardConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(BoardConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load `specs/{id}.ron`, falling back to `specs/{id}.toml`.
    pub fn load_spec(&self, id: &GameSpecId) -> LoadResult<GameSpec> {
        let specs_dir = self.specs_dir();
        let path = SpecFormat::EXTENSIONS
            .iter()
            .map(|(extension, _)| specs_dir.join(format!("{}.{}", id, extension)))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| {
                anyhow::anyhow!("No spec named {} in {}", id, specs_dir.display())
            })?;

        let spec = GameSpecLoader::load(&path)?;
        if &spec.id != id {
            anyhow::bail!(
                "Spec file {} declares id {} instead of {}",
                path.display(),
                spec.id,
                id
            );
        }
        Ok(spec)
    }

    /// Load every spec file under `specs/`. Files with other extensions are skipped.
    pub fn load_catalog(&self) -> LoadResult<SpecCatalog> {
        let specs_dir = self.specs_dir();
        let entries = std::fs::read_dir(&specs_dir).map_err(|e| {
            anyhow::anyhow!("Failed to read spec directory {}: {}", specs_dir.display(), e)
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && SpecFormat::from_path(&path).is_ok() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = SpecCatalog::new();
        for path in paths {
            catalog.insert(GameSpecLoader::load(&path)?);
        }
        Ok(catalog)
    }

    fn specs_dir(&self) -> PathBuf {
        self.data_dir.join("specs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"(
        id: "tokens",
        board: (width: 100, height: 100, image: (id: "b", download_url: "b.png")),
        pieces: [(kind: standard, images: [], width: 10, height: 10)],
    )"#;

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let specs = dir.path().join("specs");
        std::fs::create_dir(&specs).unwrap();
        std::fs::write(specs.join("tokens.ron"), SPEC).unwrap();
        std::fs::write(specs.join("README.md"), "ignored").unwrap();
        dir
    }

    #[test]
    fn loads_spec_by_id() {
        let dir = data_dir();
        let factory = ContentFactory::new(dir.path());

        let spec = factory.load_spec(&GameSpecId::new("tokens")).unwrap();
        assert_eq!(spec.piece_count(), 1);
        assert!(factory.load_spec(&GameSpecId::new("chess")).is_err());
    }

    #[test]
    fn mismatched_id_is_rejected() {
        let dir = data_dir();
        std::fs::write(dir.path().join("specs/other.ron"), SPEC).unwrap();
        let factory = ContentFactory::new(dir.path());
        assert!(factory.load_spec(&GameSpecId::new("other")).is_err());
    }

    #[test]
    fn catalog_skips_foreign_files() {
        let dir = data_dir();
        let catalog = ContentFactory::new(dir.path()).load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let dir = data_dir();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), BoardConfig::default());
    }
}
