//! Error classification shared by every layer.
//!
//! `StateError` and `ParticipantError` live next to the code that raises them;
//! the runtime wraps both. Callers branch on [`BoardError::severity`] rather
//! than on individual variants.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// A remote write or subscription hiccup. Local state is intact and the
    /// operation can be retried.
    Recoverable,

    /// The mutation was rejected before touching the working snapshot.
    Validation,

    /// Snapshot and spec disagree. Indicates a bug.
    Internal,

    /// The session cannot continue, e.g. the user holds no seat.
    Fatal,
}

impl ErrorSeverity {
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// True when the working snapshot was left exactly as it was.
    pub const fn left_state_untouched(self) -> bool {
        matches!(self, Self::Validation | Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error enum in the workspace.
pub trait BoardError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs, e.g. `STATE_INVALID_PIECE_INDEX`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
