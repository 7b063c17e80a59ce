use crate::lane::Side;
use crate::types::{Ability, Artifact, Unit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Non-owning handle to a fighter in the battle's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FighterId(pub u32);

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mutable combat entity instantiated from a [`Unit`] template.
///
/// Created on summon, mutated by damage/buff/trait effects, destroyed on
/// death cleanup or retreat. Owned exclusively by its lane slot (via the
/// registry) until removed.
#[derive(Debug, Clone)]
pub struct Fighter {
    pub unit: Unit,
    pub side: Side,
    pub health: i32,
    pub attack: i32,
    pub fast: bool,
    pub agile: i32,
    pub block: i32,
    pub armor: i32,
    pub anti_agile: bool,
    pub anti_block: bool,
    pub morph: bool,
    pub combo: bool,
    pub slow: bool,
    pub steady: bool,
    /// Earned a follow-up attack this round.
    pub has_combo: bool,
    pub is_attacking: bool,
    pub retreated: bool,
    pub is_artifact: bool,
    pub artifact: Option<Artifact>,
    /// -1 = undecided, 0 = selected for use, 1 = already fired.
    pub artifact_used: i8,
    pub abilities: Vec<Ability>,
}

impl Fighter {
    pub fn from_unit(unit: &Unit, side: Side) -> Self {
        Self {
            side,
            health: unit.health,
            attack: unit.attack,
            fast: unit.fast,
            agile: unit.agile,
            block: unit.block,
            armor: unit.armor,
            anti_agile: unit.anti_agile,
            anti_block: unit.anti_block,
            morph: unit.morph,
            combo: unit.combo,
            slow: unit.slow,
            steady: unit.steady,
            has_combo: false,
            is_attacking: false,
            retreated: false,
            is_artifact: false,
            artifact: None,
            artifact_used: -1,
            abilities: unit.abilities.clone(),
            unit: unit.clone(),
        }
    }

    /// The per-side artifact holder: a special fighter outside the lanes.
    /// Its combat traits are forced off so the damage pipeline treats it as
    /// a plain 1-health body.
    pub fn artifact_holder(side: Side, artifact: Option<Artifact>) -> Self {
        let unit = Unit::new(&format!("{side} artifact holder"), 1, 0, 0);
        let abilities = artifact
            .as_ref()
            .map(|a| vec![a.ability.clone()])
            .unwrap_or_default();
        Self {
            unit,
            side,
            health: 1,
            attack: 0,
            fast: false,
            agile: 0,
            block: 0,
            armor: 0,
            anti_agile: false,
            anti_block: false,
            morph: false,
            combo: false,
            slow: false,
            steady: false,
            has_combo: false,
            is_attacking: false,
            retreated: false,
            is_artifact: true,
            artifact,
            artifact_used: -1,
            abilities,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Owns every fighter in a battle and hands out [`FighterId`] handles.
#[derive(Debug, Default)]
pub struct FighterRegistry {
    fighters: BTreeMap<FighterId, Fighter>,
    next: u32,
}

impl FighterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fighter: Fighter) -> FighterId {
        let id = FighterId(self.next);
        self.next += 1;
        self.fighters.insert(id, fighter);
        id
    }

    pub fn remove(&mut self, id: FighterId) -> Option<Fighter> {
        self.fighters.remove(&id)
    }

    pub fn get(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.get(&id)
    }

    pub fn get_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.fighters.get_mut(&id)
    }

    pub fn contains(&self, id: FighterId) -> bool {
        self.fighters.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FighterId, &Fighter)> {
        self.fighters.iter().map(|(&id, f)| (id, f))
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }
}
