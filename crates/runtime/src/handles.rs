//! Renderer-side bookkeeping for animation events.
//!
//! A renderer registers one handle per piece (a sprite, a widget id, a test
//! probe) and routes each [`AnimationEvent`] to the handle by index.

use std::collections::BTreeMap;

use board_core::{Animation, AnimationEvent, BoardConfig, GameSpec, PieceIndex, PieceSpec};

/// Handle table keyed by piece index.
#[derive(Clone, Debug)]
pub struct PieceHandles<H> {
    handles: BTreeMap<PieceIndex, H>,
}

impl<H> Default for PieceHandles<H> {
    fn default() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }
}

impl<H> PieceHandles<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one handle per spec piece.
    pub fn for_spec(spec: &GameSpec, mut make: impl FnMut(PieceIndex, &PieceSpec) -> H) -> Self {
        let handles = spec
            .pieces
            .iter()
            .enumerate()
            .map(|(position, piece)| {
                let index = PieceIndex::from_usize(position);
                (index, make(index, piece))
            })
            .collect();
        Self { handles }
    }

    pub fn insert(&mut self, index: PieceIndex, handle: H) -> Option<H> {
        self.handles.insert(index, handle)
    }

    pub fn remove(&mut self, index: PieceIndex) -> Option<H> {
        self.handles.remove(&index)
    }

    pub fn get(&self, index: PieceIndex) -> Option<&H> {
        self.handles.get(&index)
    }

    pub fn get_mut(&mut self, index: PieceIndex) -> Option<&mut H> {
        self.handles.get_mut(&index)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Runs `apply` for every event whose piece has a handle and returns how
    /// many events were dispatched.
    pub fn dispatch(
        &mut self,
        events: &[AnimationEvent],
        mut apply: impl FnMut(&mut H, &Animation),
    ) -> usize {
        let mut dispatched = 0;
        for event in events {
            match self.handles.get_mut(&event.index) {
                Some(handle) => {
                    apply(handle, &event.animation);
                    dispatched += 1;
                }
                None => tracing::trace!(index = %event.index, "no handle for animated piece"),
            }
        }
        dispatched
    }
}

/// Concrete motion a renderer plays for an [`Animation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tween {
    Slide { x: f64, y: f64, seconds: f64 },
    /// Spin by `degrees` on top of the current rotation.
    Rotate { degrees: f64, seconds: f64 },
}

impl Tween {
    pub fn for_animation(animation: &Animation, config: &BoardConfig) -> Self {
        match *animation {
            Animation::Position { x, y } => Self::Slide {
                x,
                y,
                seconds: config.animation_seconds,
            },
            Animation::Flip | Animation::Roll => Self::Rotate {
                degrees: config.flip_animation_degrees,
                seconds: config.animation_seconds,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::{BoardSpec, GameSpecId, PieceKind};

    #[test]
    fn dispatch_routes_by_index() {
        let spec = GameSpec::new(
            GameSpecId::new("handles"),
            BoardSpec::default(),
            vec![
                PieceSpec::new(PieceKind::Dice, vec![]),
                PieceSpec::new(PieceKind::Card, vec![]),
            ],
        );
        let mut handles = PieceHandles::for_spec(&spec, |_, _| Vec::<Tween>::new());
        handles.remove(PieceIndex(1));

        let config = BoardConfig::default();
        let dispatched = handles.dispatch(
            &[
                AnimationEvent::new(PieceIndex(0), Animation::Roll),
                AnimationEvent::new(PieceIndex(1), Animation::Flip),
            ],
            |played, animation| played.push(Tween::for_animation(animation, &config)),
        );

        assert_eq!(dispatched, 1);
        assert_eq!(
            handles.get(PieceIndex(0)).unwrap(),
            &vec![Tween::Rotate { degrees: 720.0, seconds: 0.5 }]
        );
    }

    #[test]
    fn position_becomes_slide() {
        let tween = Tween::for_animation(
            &Animation::Position { x: 10.0, y: 20.0 },
            &BoardConfig::default(),
        );
        assert_eq!(tween, Tween::Slide { x: 10.0, y: 20.0, seconds: 0.5 });
    }
}
