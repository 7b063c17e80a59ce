//! Ability triggering: the index from events to candidate abilities, the
//! pending-trigger queue, and the activation loop that drains it.

use crate::battle::Battle;
use crate::events::{AnimationState, BattleEvent, SoundCue};
use crate::fighter::FighterId;
use crate::lane::{Location, Side};
use crate::limits::MAX_TRIGGERS_PER_ACTIVATION;
use crate::types::{Ability, CauseType, Effect, EffectKind, EffectType};
use std::collections::HashMap;

/// Handle to one ability slot of a registered fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AbilityRef {
    pub owner: FighterId,
    pub slot: usize,
}

/// An ability whose cause has fired, waiting its turn to resolve.
#[derive(Debug, Clone)]
pub(crate) struct Trigger {
    pub ability: AbilityRef,
    pub cause_source: Option<FighterId>,
    pub cause_target: Option<FighterId>,
}

/// Lookup from (cause type, first effect type) to the abilities that could
/// respond, so an event only inspects abilities that can possibly match.
#[derive(Debug, Default)]
pub(crate) struct AbilityIndex {
    buckets: HashMap<(CauseType, EffectType), Vec<AbilityRef>>,
}

impl AbilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every ability of a newly summoned fighter.
    pub fn register(&mut self, owner: FighterId, abilities: &[Ability]) {
        for (slot, ability) in abilities.iter().enumerate() {
            let effect = match ability.effects.first() {
                Some(e) => e.kind.effect_type(),
                None => {
                    log::error!(
                        "fighter {owner} ability '{}' has no effects, skipping",
                        ability.description
                    );
                    continue;
                }
            };
            self.buckets
                .entry((ability.cause.kind, effect))
                .or_default()
                .push(AbilityRef { owner, slot });
        }
    }

    /// Drop every ability belonging to a removed fighter.
    pub fn unregister(&mut self, owner: FighterId) {
        for refs in self.buckets.values_mut() {
            refs.retain(|r| r.owner != owner);
        }
    }

    pub fn refs(&self, cause: CauseType, effect: EffectType) -> &[AbilityRef] {
        self.buckets
            .get(&(cause, effect))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn contains(&self, owner: FighterId) -> bool {
        self.buckets.values().flatten().any(|r| r.owner == owner)
    }
}

/// Sort key for pending triggers. Derived ordering compares the cause rank,
/// then the effect ranks slot by slot with shorter lists first, then the
/// owner's unit name, which pins the resolution order for any queue state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct TriggerKey {
    cause: usize,
    effects: Vec<usize>,
    owner_unit: String,
}

impl Battle {
    pub(crate) fn ability(&self, r: AbilityRef) -> Option<&Ability> {
        self.fighters.get(r.owner)?.abilities.get(r.slot)
    }

    /// An event happened: queue every indexed ability whose cause filters
    /// accept its source and target.
    ///
    /// Events aimed at an artifact holder skip the index entirely; the
    /// holder's single ability fires unconditionally.
    pub(crate) fn trigger_abilities(
        &mut self,
        cause: CauseType,
        source: Option<FighterId>,
        target: Option<FighterId>,
    ) {
        if let Some(id) = target {
            let holds_artifact = self
                .fighters
                .get(id)
                .map_or(false, |f| f.is_artifact && f.artifact.is_some());
            if holds_artifact {
                self.pending.push(Trigger {
                    ability: AbilityRef { owner: id, slot: 0 },
                    cause_source: source,
                    cause_target: target,
                });
                return;
            }
        }

        for effect in self.order.effects.clone() {
            let refs = self.index.refs(cause, effect).to_vec();
            for r in refs {
                let ability = match self.ability(r) {
                    Some(a) => a.clone(),
                    None => continue,
                };
                let reference = self.location_of(r.owner);
                let sources = self.units_possible(&ability.cause.source, reference);
                let targets = self.units_possible(&ability.cause.target, reference);
                if sources.contains(&source) && targets.contains(&target) {
                    self.pending.push(Trigger {
                        ability: r,
                        cause_source: source,
                        cause_target: target,
                    });
                }
            }
        }
    }

    fn trigger_key(&self, trigger: &Trigger) -> TriggerKey {
        match self.ability(trigger.ability) {
            Some(ability) => TriggerKey {
                cause: self.order.cause_rank(ability.cause.kind),
                effects: ability
                    .effects
                    .iter()
                    .map(|e| self.order.effect_rank(e.kind.effect_type()))
                    .collect(),
                owner_unit: self
                    .fighters
                    .get(trigger.ability.owner)
                    .map(|f| f.unit.name.clone())
                    .unwrap_or_default(),
            },
            None => TriggerKey {
                cause: usize::MAX,
                effects: Vec::new(),
                owner_unit: String::new(),
            },
        }
    }

    /// Drain the pending-trigger queue to empty.
    ///
    /// Each pass re-sorts whatever is queued, peels off the leading run of
    /// equal-key triggers as one simultaneous batch, revalidates each member,
    /// and applies the survivors. Effects may queue new triggers, which join
    /// the next pass. Artifact abilities always resolve alone.
    pub(crate) fn activate_triggers(&mut self) {
        let mut resolved: u32 = 0;
        while !self.pending.is_empty() {
            if resolved >= MAX_TRIGGERS_PER_ACTIVATION {
                log::warn!(
                    "trigger cascade exceeded {MAX_TRIGGERS_PER_ACTIVATION}, dropping {} pending",
                    self.pending.len()
                );
                self.pending.clear();
                break;
            }

            let pending = std::mem::take(&mut self.pending);
            let mut keyed: Vec<(TriggerKey, Trigger)> = pending
                .into_iter()
                .map(|t| (self.trigger_key(&t), t))
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));

            let head_key = keyed[0].0.clone();
            let head_is_artifact = self
                .fighters
                .get(keyed[0].1.ability.owner)
                .map_or(false, |f| f.is_artifact);
            let batch_len = if head_is_artifact {
                1
            } else {
                keyed.iter().take_while(|(k, _)| *k == head_key).count()
            };
            let batch: Vec<Trigger> = keyed.drain(..batch_len).map(|(_, t)| t).collect();
            self.pending = keyed.into_iter().map(|(_, t)| t).collect();
            resolved += batch.len() as u32;

            // Conditions can have shifted since queueing, so recheck.
            let mut usable = Vec::new();
            for trigger in batch {
                if self.can_use(&trigger) {
                    usable.push(trigger);
                }
            }
            if usable.is_empty() {
                continue;
            }

            self.shake = 0;
            let announce = usable[0].ability.owner;
            if let Some(ability) = self.ability(usable[0].ability) {
                let description = ability.description.clone();
                self.events.push(BattleEvent::AbilityAnnounce {
                    owner: announce,
                    description,
                });
                self.events.push(BattleEvent::Pause { seconds: 1.0 });
            }

            for trigger in &usable {
                let owner = trigger.ability.owner;
                let (is_artifact, is_left) = match self.fighters.get(owner) {
                    Some(f) => (f.is_artifact, f.side.is_left()),
                    None => continue,
                };
                if is_left && !is_artifact {
                    self.score.ability_triggers += 1;
                }
                if !is_artifact {
                    self.events.push(BattleEvent::Animation {
                        fighter: owner,
                        state: AnimationState::Casting,
                    });
                }
            }
            self.events.push(BattleEvent::Pause { seconds: 0.5 });

            for trigger in &usable {
                self.apply_trigger(trigger);
            }

            if self.shake > 0 {
                self.events.push(BattleEvent::Sound {
                    cue: SoundCue::Damage {
                        magnitude: self.shake,
                    },
                });
            }
            self.events.push(BattleEvent::Pause { seconds: 0.5 });

            for trigger in &usable {
                let owner = trigger.ability.owner;
                if let Some(f) = self.fighters.get(owner) {
                    if f.is_artifact {
                        continue;
                    }
                    let state = if f.is_alive() {
                        AnimationState::Idle
                    } else {
                        AnimationState::Dead
                    };
                    self.events.push(BattleEvent::Animation {
                        fighter: owner,
                        state,
                    });
                }
            }
        }
    }

    /// Whether a queued trigger can still fire: the owner must be present,
    /// pass its steadiness roll, and every effect must have at least one
    /// target and something to actually do.
    fn can_use(&mut self, trigger: &Trigger) -> bool {
        let owner = trigger.ability.owner;
        let steady = match self.fighters.get(owner) {
            Some(f) if !f.retreated => f.steady,
            _ => return false,
        };
        if steady && self.rng.value() <= 0.5 {
            self.events.push(BattleEvent::FloatingText {
                fighter: owner,
                text: "UNSTEADY".to_string(),
            });
            return false;
        }
        let reference = match self.location_of(owner) {
            Some(loc) => loc,
            None => return false,
        };
        let ability = match self.ability(trigger.ability) {
            Some(a) => a.clone(),
            None => return false,
        };

        for effect in &ability.effects {
            let targets = self.select_targets(
                &effect.target,
                owner,
                reference,
                trigger.cause_source,
                trigger.cause_target,
            );
            if targets.is_empty() {
                return false;
            }
            let worthwhile = match &effect.kind {
                EffectKind::Damage { amount } => *amount > 0,
                EffectKind::Buff { health, attack } => *health != 0 || *attack != 0,
                EffectKind::Summon { units } => !units.units.is_empty(),
                // Usable only when the owner itself has someone ahead of it.
                EffectKind::MoveFront => reference.index > 0,
                EffectKind::GainColor { amount, .. } => *amount != 0,
                EffectKind::GiveTrait { name, amount } => !name.is_empty() && *amount != 0,
                EffectKind::Retreat => true,
            };
            if !worthwhile {
                return false;
            }
        }
        true
    }

    fn apply_trigger(&mut self, trigger: &Trigger) {
        let owner = trigger.ability.owner;
        match self.fighters.get(owner) {
            Some(f) if !f.retreated => {}
            _ => return,
        }
        let reference = match self.location_of(owner) {
            Some(loc) => loc,
            None => return,
        };
        let ability = match self.ability(trigger.ability) {
            Some(a) => a.clone(),
            None => return,
        };

        for effect in &ability.effects {
            let targets = self.select_targets(
                &effect.target,
                owner,
                reference,
                trigger.cause_source,
                trigger.cause_target,
            );
            self.apply_effect(owner, reference, effect, &targets);
        }
    }

    fn apply_effect(
        &mut self,
        owner: FighterId,
        reference: Location,
        effect: &Effect,
        targets: &[FighterId],
    ) {
        match &effect.kind {
            EffectKind::Damage { amount } => {
                for &target in targets {
                    self.deal_damage(owner, target, *amount);
                }
            }
            EffectKind::Buff { health, attack } => {
                for &target in targets {
                    if let Some(f) = self.fighters.get_mut(target) {
                        f.health += health;
                        f.attack += attack;
                    } else {
                        continue;
                    }
                    self.events.push(BattleEvent::BuffMarker {
                        fighter: target,
                        health: *health,
                        attack: *attack,
                    });
                }
            }
            EffectKind::Summon { units } => {
                // One copy of the line per lane the effect reaches, at the
                // owner's own depth.
                for lane in self.select_lanes(effect.target.lane, reference) {
                    let summoned =
                        self.summon_line(lane, reference.side, units, reference.index, false);
                    for id in summoned {
                        self.trigger_abilities(CauseType::Summon, None, Some(id));
                    }
                }
            }
            EffectKind::MoveFront => {
                for &target in targets {
                    self.move_to_front(target);
                }
            }
            EffectKind::GainColor {
                amount,
                for_opponent,
            } => {
                // Credited once per effect, however many fighters it found.
                // The XOR flips the beneficiary when the effect favours the
                // opponent; only the left side accumulates colour score.
                if reference.side.is_left() ^ for_opponent {
                    self.squad_mut(Side::Left).money += amount;
                    self.score.colour_gained += amount;
                } else {
                    self.squad_mut(Side::Right).money += amount;
                }
            }
            EffectKind::GiveTrait { name, amount } => {
                for &target in targets {
                    match name.as_str() {
                        "block" => {
                            if let Some(f) = self.fighters.get_mut(target) {
                                f.block += amount;
                            } else {
                                continue;
                            }
                            self.events.push(BattleEvent::FloatingText {
                                fighter: target,
                                text: name.to_uppercase(),
                            });
                        }
                        other => {
                            log::error!("unknown trait '{other}' in give-trait effect");
                        }
                    }
                }
            }
            EffectKind::Retreat => {
                for &target in targets {
                    if self.fighters.get(target).map_or(true, |f| f.is_artifact) {
                        continue;
                    }
                    if let Some(loc) = self.location_of(target) {
                        self.retreat_fighter(loc);
                    }
                }
            }
        }
    }

    fn move_to_front(&mut self, target: FighterId) {
        if self.fighters.get(target).map_or(true, |f| f.is_artifact) {
            return;
        }
        let loc = match self.location_of(target) {
            Some(loc) if loc.index > 0 => loc,
            _ => return,
        };
        let side = self.lanes[loc.lane].side_mut(loc.side);
        side.remove(loc.index);
        side.insert(0, target);
        let moved: Vec<FighterId> = self.lanes[loc.lane].side(loc.side)[..=loc.index].to_vec();
        for (index, id) in moved.into_iter().enumerate() {
            self.events.push(BattleEvent::Moved {
                fighter: id,
                side: loc.side,
                lane: loc.lane,
                index,
                animate: true,
                charging: false,
            });
        }
    }

    /// Remove a lane fighter from play and refund part of its price in
    /// proportion to the stats it has left.
    pub(crate) fn retreat_fighter(&mut self, loc: Location) -> i32 {
        let id = match self.fighter_at(loc) {
            Some(id) => id,
            None => return 0,
        };
        let refund = match self.fighters.get(id) {
            Some(f) => {
                let base = f.unit.health + f.unit.attack;
                if base > 0 {
                    (((f.health + f.attack) as f32 / base as f32) * f.unit.price as f32).round()
                        as i32
                } else {
                    0
                }
            }
            None => return 0,
        };

        self.lanes[loc.lane].side_mut(loc.side).remove(loc.index);
        self.lanes[loc.lane].fighter_retreated = true;
        self.index.unregister(id);
        // Stays in the registry until cleanup so in-flight triggers can
        // still see it and skip it.
        if let Some(f) = self.fighters.get_mut(id) {
            f.retreated = true;
        }
        self.squad_mut(loc.side).money += refund;
        refund
    }

    /// Retreat every fighter of one side out of a lane, back row first so
    /// indices stay valid.
    pub(crate) fn retreat_all(&mut self, lane: usize, side: crate::lane::Side) {
        while let Some(index) = self.lanes[lane].side(side).len().checked_sub(1) {
            self.retreat_fighter(Location { side, lane, index });
        }
    }
}
