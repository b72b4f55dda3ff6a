/// Where a session stands relative to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// No delivery observed yet.
    Uninitialized,
    /// The working snapshot equals the last delivery or an acknowledged write.
    Synced,
    /// A local mutation is applied but the store has not accepted it.
    PendingLocalWrite,
}

impl SessionPhase {
    pub fn is_synced(self) -> bool {
        self == Self::Synced
    }
}
