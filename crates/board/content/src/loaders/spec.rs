//! Game spec loader.
//!
//! Specs may be written in RON or TOML; the format is chosen from the file
//! extension. Both formats map one-to-one onto [`GameSpec`].

use std::path::Path;

use board_core::{GameSpec, PieceIndex};

use crate::loaders::{LoadResult, read_file};

/// On-disk encoding of a spec file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecFormat {
    Ron,
    Toml,
}

impl SpecFormat {
    pub const EXTENSIONS: [(&'static str, SpecFormat); 2] =
        [("ron", SpecFormat::Ron), ("toml", SpecFormat::Toml)];

    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        Self::EXTENSIONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(extension))
            .map(|(_, format)| *format)
            .ok_or_else(|| {
                anyhow::anyhow!("Unsupported spec extension for {}", path.display())
            })
    }
}

/// Loader for game specs.
pub struct GameSpecLoader;

impl GameSpecLoader {
    /// Load and validate a spec file.
    pub fn load(path: &Path) -> LoadResult<GameSpec> {
        let format = SpecFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse(&content, format)
            .map_err(|e| anyhow::anyhow!("Invalid game spec {}: {}", path.display(), e))
    }

    pub fn parse(content: &str, format: SpecFormat) -> LoadResult<GameSpec> {
        let spec: GameSpec = match format {
            SpecFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse spec RON: {}", e))?,
            SpecFormat::Toml => toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse spec TOML: {}", e))?,
        };
        Self::validate(&spec)?;
        Ok(spec)
    }

    /// Deck references must point at another piece of the same spec.
    pub fn validate(spec: &GameSpec) -> LoadResult<()> {
        if spec.id.as_str().is_empty() {
            anyhow::bail!("game spec id must not be empty");
        }

        for (position, piece) in spec.pieces.iter().enumerate() {
            let index = PieceIndex::from_usize(position);
            let Some(deck) = piece.deck_piece_index else {
                continue;
            };
            if deck == index {
                anyhow::bail!("piece {} lists itself as its deck", index);
            }
            if deck.as_usize() >= spec.piece_count() {
                anyhow::bail!(
                    "piece {} belongs to deck {} but the spec has {} pieces",
                    index,
                    deck,
                    spec.piece_count()
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::PieceKind;

    const RON_SPEC: &str = r#"(
        id: "solitaire",
        board: (width: 1000, height: 500, image: (id: "felt", download_url: "felt.png")),
        pieces: [
            (kind: standard, images: [(id: "deck", download_url: "deck.png")], width: 60, height: 90,
             anchor: (x: 10.0, y: 20.0)),
            (kind: card, images: [(id: "ace", download_url: "ace.png"), (id: "back", download_url: "back.png")],
             width: 60, height: 90, deck_piece_index: Some(0)),
            (kind: dice, images: [], width: 30, height: 30, is_draggable: true),
        ],
    )"#;

    const TOML_SPEC: &str = r#"
id = "solitaire"

[board]
width = 1000
height = 500
image = { id = "felt", download_url = "felt.png" }

[[pieces]]
kind = "standard"
images = [{ id = "deck", download_url = "deck.png" }]
width = 60
height = 90
anchor = { x = 10.0, y = 20.0 }

[[pieces]]
kind = "card"
images = [{ id = "ace", download_url = "ace.png" }, { id = "back", download_url = "back.png" }]
width = 60
height = 90
deck_piece_index = 0

[[pieces]]
kind = "dice"
images = []
width = 30
height = 30
is_draggable = true
"#;

    #[test]
    fn ron_and_toml_describe_the_same_spec() {
        let from_ron = GameSpecLoader::parse(RON_SPEC, SpecFormat::Ron).unwrap();
        let from_toml = GameSpecLoader::parse(TOML_SPEC, SpecFormat::Toml).unwrap();
        assert_eq!(from_ron, from_toml);

        assert_eq!(from_ron.piece_count(), 3);
        assert_eq!(from_ron.kind_of(PieceIndex(1)), Some(PieceKind::Card));
        assert_eq!(from_ron.deck_members(PieceIndex(0)), vec![PieceIndex(1)]);
        assert_eq!(from_ron.deck_anchor(PieceIndex(0)).y, 20.0);
        assert!(from_ron.pieces[2].is_draggable);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SpecFormat::from_path(Path::new("a/b.ron")).unwrap(), SpecFormat::Ron);
        assert_eq!(SpecFormat::from_path(Path::new("b.TOML")).unwrap(), SpecFormat::Toml);
        assert!(SpecFormat::from_path(Path::new("b.json")).is_err());
        assert!(SpecFormat::from_path(Path::new("spec")).is_err());
    }

    #[test]
    fn dangling_deck_reference_is_rejected() {
        let broken = TOML_SPEC.replace("deck_piece_index = 0", "deck_piece_index = 7");
        let err = GameSpecLoader::parse(&broken, SpecFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("deck 7"));

        let self_deck = TOML_SPEC.replace("deck_piece_index = 0", "deck_piece_index = 1");
        assert!(GameSpecLoader::parse(&self_deck, SpecFormat::Toml).is_err());
    }

    #[test]
    fn load_reads_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solitaire.ron");
        std::fs::write(&path, RON_SPEC).unwrap();

        let spec = GameSpecLoader::load(&path).unwrap();
        assert_eq!(spec.id.as_str(), "solitaire");
    }
}
