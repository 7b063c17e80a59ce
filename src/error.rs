use thiserror::Error;

/// Errors surfaced to the driver. Most malformed data is tolerated with a
/// logged message instead, so this taxonomy stays small.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BattleError {
    /// `confirm_setup` was called while the battle was not paused at the
    /// pre-battle artifact decision.
    #[error("battle is not awaiting setup")]
    NotAwaitingSetup,
}
