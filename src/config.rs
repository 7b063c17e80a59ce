use crate::types::{CauseType, EffectType};
use serde::{Deserialize, Serialize};

/// Lane count and per-lane capacity for a battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSettings {
    pub lanes: usize,
    pub lane_capacity: usize,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            lanes: 3,
            lane_capacity: 5,
        }
    }
}

impl BattleSettings {
    pub fn new(lanes: usize, lane_capacity: usize) -> Self {
        Self {
            lanes,
            lane_capacity,
        }
    }
}

/// The injected total order over cause and effect types used when sorting
/// pending triggers. Types missing from a list sort after everything listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationOrder {
    pub causes: Vec<CauseType>,
    pub effects: Vec<EffectType>,
}

impl Default for ActivationOrder {
    fn default() -> Self {
        Self {
            causes: vec![
                CauseType::Artifact,
                CauseType::Summon,
                CauseType::Step,
                CauseType::Bonus,
                CauseType::Block,
                CauseType::Nonlethal,
                CauseType::Death,
            ],
            effects: vec![
                EffectType::Damage,
                EffectType::Buff,
                EffectType::Summon,
                EffectType::MoveFront,
                EffectType::GainColor,
                EffectType::GiveTrait,
                EffectType::Retreat,
            ],
        }
    }
}

impl ActivationOrder {
    pub fn cause_rank(&self, cause: CauseType) -> usize {
        self.causes
            .iter()
            .position(|&c| c == cause)
            .unwrap_or(usize::MAX)
    }

    pub fn effect_rank(&self, effect: EffectType) -> usize {
        self.effects
            .iter()
            .position(|&e| e == effect)
            .unwrap_or(usize::MAX)
    }
}
