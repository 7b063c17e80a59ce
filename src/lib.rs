//! Deterministic battle resolution for a lane-based auto battler.
//!
//! Two squads deploy lines of fighters into parallel lanes and the engine
//! resolves the battle to an [`Outcome`]: waves of weighted random summons,
//! front-fighter exchanges through a layered damage pipeline, and a
//! data-driven ability system where causes queue triggers and a sorting
//! pass resolves them in a stable order.
//!
//! The engine is headless. It emits a [`BattleEvent`] stream a client can
//! replay for presentation, but consumes nothing back, and all randomness
//! goes through an injected [`BattleRng`] so a seeded battle replays
//! identically.
//!
//! ```
//! use chroma_arena::{
//!     ActivationOrder, Battle, BattleSettings, BattleStatus, Colour, Line, Squad, Unit,
//!     XorShiftRng,
//! };
//!
//! let colour = Colour::neutral("gray");
//! let left = Squad::new(
//!     "left",
//!     colour.clone(),
//!     vec![Line::new(vec![Unit::new("grunt", 3, 2, 10)])],
//!     30,
//! );
//! let right = Squad::new(
//!     "right",
//!     colour,
//!     vec![Line::new(vec![Unit::new("grunt", 3, 2, 10)])],
//!     30,
//! );
//! let mut battle = Battle::new(
//!     BattleSettings::default(),
//!     ActivationOrder::default(),
//!     left,
//!     right,
//!     Box::new(XorShiftRng::seed_from_u64(1)),
//! );
//! match battle.run() {
//!     BattleStatus::Finished(outcome) => println!("{outcome:?}"),
//!     status => println!("paused: {status:?}"),
//! }
//! ```

pub mod battle;
mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod fighter;
pub mod lane;
pub mod limits;
pub mod rng;
pub mod squad;
mod targeting;
mod triggers;
pub mod types;

pub use battle::{Battle, BattleStatus, Outcome};
pub use config::{ActivationOrder, BattleSettings};
pub use error::BattleError;
pub use events::{AnimationState, BattleEvent, ScoreBoard, SoundCue};
pub use fighter::{Fighter, FighterId};
pub use lane::{Lane, Location, Side};
pub use rng::{BattleRng, StdBattleRng, XorShiftRng};
pub use squad::Squad;
pub use types::{
    Ability, Artifact, Cause, CauseFilter, CauseLane, CauseType, CauseUnitType, Colour, Effect,
    EffectFilter, EffectKind, EffectLane, EffectType, EffectUnitType, Line, Unit,
};

#[cfg(test)]
mod tests;
