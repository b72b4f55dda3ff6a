/// Board configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    /// Reject `toggle_image`/`roll_dice` on pieces of the wrong kind.
    ///
    /// Off by default: existing matches rely on mutations being applied
    /// regardless of kind.
    pub validate_kinds: bool,

    /// Clamp coordinates written by move/drag to the board percentage range.
    pub clamp_coordinates: bool,

    /// Rotation played by flip and roll animations, in degrees.
    pub flip_animation_degrees: f64,

    /// Duration of every animation, in seconds.
    pub animation_seconds: f64,
}

impl BoardConfig {
    // ===== board geometry =====
    /// Lower bound of the percentage coordinate system.
    pub const MIN_COORDINATE: f64 = 0.0;
    /// Upper bound of the percentage coordinate system.
    pub const MAX_COORDINATE: f64 = 100.0;

    // ===== view layering =====
    /// Layer used for a card visible to the viewing seat.
    pub const VISIBLE_CARD_LAYER: u32 = 50;
    /// Layer used for everything else.
    pub const DEFAULT_LAYER: u32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FLIP_DEGREES: f64 = 720.0;
    pub const DEFAULT_ANIMATION_SECONDS: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            validate_kinds: false,
            clamp_coordinates: false,
            flip_animation_degrees: Self::DEFAULT_FLIP_DEGREES,
            animation_seconds: Self::DEFAULT_ANIMATION_SECONDS,
        }
    }

    /// Strict configuration: kind checks and coordinate clamping enabled.
    pub fn strict() -> Self {
        Self {
            validate_kinds: true,
            clamp_coordinates: true,
            ..Self::new()
        }
    }

    /// Applies the clamping policy to a single coordinate.
    pub fn coordinate(&self, value: f64) -> f64 {
        if self.clamp_coordinates {
            value.clamp(Self::MIN_COORDINATE, Self::MAX_COORDINATE)
        } else {
            value
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new()
    }
}
