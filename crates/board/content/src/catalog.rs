//! In-memory catalog of game specs.

use std::collections::BTreeMap;
use std::sync::Arc;

use board_core::{GameSpec, GameSpecId};

/// Game specs indexed by id and shared through `Arc`.
#[derive(Clone, Debug, Default)]
pub struct SpecCatalog {
    specs: BTreeMap<GameSpecId, Arc<GameSpec>>,
}

impl SpecCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec`, replacing any spec with the same id.
    pub fn insert(&mut self, spec: GameSpec) -> Arc<GameSpec> {
        let spec = Arc::new(spec);
        self.specs.insert(spec.id.clone(), Arc::clone(&spec));
        spec
    }

    pub fn get(&self, id: &GameSpecId) -> Option<Arc<GameSpec>> {
        self.specs.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &GameSpecId> {
        self.specs.keys()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl FromIterator<GameSpec> for SpecCatalog {
    fn from_iter<I: IntoIterator<Item = GameSpec>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for spec in iter {
            catalog.insert(spec);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::BoardSpec;

    fn spec(id: &str, pieces: usize) -> GameSpec {
        let pieces = (0..pieces)
            .map(|_| board_core::PieceSpec::new(board_core::PieceKind::Standard, vec![]))
            .collect();
        GameSpec::new(GameSpecId::new(id), BoardSpec::default(), pieces)
    }

    #[test]
    fn later_insert_replaces_earlier() {
        let mut catalog: SpecCatalog = [spec("chess", 32), spec("go", 0)].into_iter().collect();
        assert_eq!(catalog.len(), 2);

        catalog.insert(spec("chess", 16));
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&GameSpecId::new("chess")).map(|spec| spec.piece_count()),
            Some(16)
        );
        assert!(catalog.get(&GameSpecId::new("poker")).is_none());
    }

    #[test]
    fn ids_are_sorted() {
        let catalog: SpecCatalog = [spec("b", 0), spec("a", 0)].into_iter().collect();
        let ids: Vec<_> = catalog.ids().map(GameSpecId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
