//! Runaway-battle guards.
//!
//! Self-sustaining ability loops (summons triggering summons, endless
//! refills) are legal data, so the resolver carries hard ceilings and force
//! a draw instead of spinning forever.

/// A round here is one full step/attack cycle pushed onto the flow queue.
pub const MAX_ROUNDS: u32 = 500;
/// Triggers resolved within a single activation pass.
pub const MAX_TRIGGERS_PER_ACTIVATION: u32 = 1_000;
/// Fighters summoned over the whole battle, deployment waves included.
pub const MAX_SUMMONS_PER_BATTLE: u32 = 10_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct BattleLimits {
    rounds: u32,
    summons: u32,
}

impl BattleLimits {
    /// Counts a round; true while under the ceiling.
    pub fn record_round(&mut self) -> bool {
        self.rounds += 1;
        if self.rounds > MAX_ROUNDS {
            log::warn!("battle exceeded {MAX_ROUNDS} rounds, forcing a draw");
            return false;
        }
        true
    }

    /// Counts a summoned fighter; true while under the ceiling.
    pub fn record_summon(&mut self) -> bool {
        self.summons += 1;
        if self.summons > MAX_SUMMONS_PER_BATTLE {
            log::warn!("battle exceeded {MAX_SUMMONS_PER_BATTLE} summons, suppressing further summons");
            return false;
        }
        true
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}
