//! Notifications the core emits for presentation, audio, and scoring.
//!
//! The engine never reads anything back from these; a driver replays the
//! event stream at whatever pace it likes (respecting [`BattleEvent::Pause`]
//! markers) or drops it entirely, as tests do.

use crate::battle::Outcome;
use crate::fighter::FighterId;
use crate::lane::Side;
use serde::{Deserialize, Serialize};

/// Animation-state transitions a renderer can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationState {
    Idle,
    Attacking,
    Casting,
    Dead,
}

/// Discrete sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SoundCue {
    /// Fighters marching in during a summon wave.
    Summon,
    /// The charge before a clash.
    Charge,
    /// Tiered by the accumulated damage magnitude since the last reset.
    Damage { magnitude: i32 },
    Victory,
    Fail,
    Draw,
}

/// One entry in the battle's presentation stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BattleEvent {
    /// Pacing marker: how long the driver should dwell here at normal
    /// playback speed.
    #[serde(rename_all = "camelCase")]
    Pause { seconds: f32 },
    #[serde(rename_all = "camelCase")]
    Summoned {
        fighter: FighterId,
        side: Side,
        lane: usize,
        index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Moved {
        fighter: FighterId,
        side: Side,
        lane: usize,
        index: usize,
        animate: bool,
        charging: bool,
    },
    #[serde(rename_all = "camelCase")]
    Animation {
        fighter: FighterId,
        state: AnimationState,
    },
    /// Floating text over a fighter: "DODGED", "BLOCKED", "FAST", "COMBO",
    /// "SLOW", trait names, and the like.
    #[serde(rename_all = "camelCase")]
    FloatingText { fighter: FighterId, text: String },
    #[serde(rename_all = "camelCase")]
    BuffMarker {
        fighter: FighterId,
        health: i32,
        attack: i32,
    },
    #[serde(rename_all = "camelCase")]
    DamageNumber {
        fighter: FighterId,
        amount: i32,
        critical: bool,
    },
    /// An ability batch is about to resolve; shows the owner's description.
    #[serde(rename_all = "camelCase")]
    AbilityAnnounce {
        owner: FighterId,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    Sound { cue: SoundCue },
    SoundStop,
    #[serde(rename_all = "camelCase")]
    BattleEnd { outcome: Outcome },
}

/// Counters the core increments as a side effect of its operations, for the
/// meta layer to read after the round. Tracks the left (player) side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub attacks: u32,
    pub casualties: u32,
    pub criticals: u32,
    pub blocks: u32,
    pub damage_dealt: i32,
    pub ability_triggers: u32,
    pub colour_gained: i32,
    pub rounds_won: u32,
}
