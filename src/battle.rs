//! Battle state and the work-queue flow controller.
//!
//! A battle advances one [`FlowStep`] per [`Battle::tick`]. Steps push
//! follow-up steps onto the front of the queue, which is how nested flows
//! (a cleanup refilling an empty lane mid-round, say) are expressed without
//! reentrancy. When the queue runs dry and no outcome is set, a fresh
//! step/attack round is scheduled.

use crate::config::{ActivationOrder, BattleSettings};
use crate::error::BattleError;
use crate::events::{AnimationState, BattleEvent, ScoreBoard, SoundCue};
use crate::fighter::{Fighter, FighterId, FighterRegistry};
use crate::lane::{Lane, Location, Side};
use crate::limits::BattleLimits;
use crate::rng::BattleRng;
use crate::squad::Squad;
use crate::triggers::{AbilityIndex, Trigger};
use crate::types::{CauseType, Line};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Final result of a battle, from the left side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    LeftWin,
    Draw,
    RightWin,
}

/// What the driver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    /// More steps to run; keep ticking.
    Running,
    /// Paused for the pre-battle artifact decision; call
    /// [`Battle::confirm_setup`].
    AwaitingSetup,
    Finished(Outcome),
}

/// One unit of work in the battle flow.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FlowStep {
    /// Summon fighters into the given lanes until money or space runs out.
    DeployWave { lanes: Vec<usize> },
    /// Fire artifact and summon causes for everything the last wave placed.
    ResolveSummons,
    /// Drain the pending-trigger queue, clean the lanes, and re-check them.
    ResolveTriggers,
    CheckLanes,
    StepPhase,
    AttackPhase { combo: bool },
}

pub struct Battle {
    pub(crate) settings: BattleSettings,
    pub(crate) order: ActivationOrder,
    pub(crate) left: Squad,
    pub(crate) right: Squad,
    pub(crate) lanes: Vec<Lane>,
    pub(crate) fighters: FighterRegistry,
    pub(crate) index: AbilityIndex,
    pub(crate) pending: Vec<Trigger>,
    pub(crate) pending_summons: Vec<FighterId>,
    left_holder: FighterId,
    right_holder: FighterId,
    queue: VecDeque<FlowStep>,
    awaiting_setup: bool,
    outcome: Option<Outcome>,
    /// Right's money as of battle start, restored on a draw.
    right_money_init: i32,
    /// Damage accumulated since the last reset, for sound magnitude.
    pub(crate) shake: i32,
    pub(crate) score: ScoreBoard,
    limits: BattleLimits,
    pub(crate) events: Vec<BattleEvent>,
    pub(crate) rng: Box<dyn BattleRng>,
}

impl Battle {
    pub fn new(
        settings: BattleSettings,
        order: ActivationOrder,
        mut left: Squad,
        mut right: Squad,
        rng: Box<dyn BattleRng>,
    ) -> Self {
        left.money = left.start_money;
        if left.is_boss {
            left.money += left.start_money / 10;
        }
        right.money = right.start_money;
        if right.is_boss {
            right.money += right.start_money / 10;
        }
        let right_money_init = right.money;

        let mut fighters = FighterRegistry::new();
        let left_holder =
            fighters.insert(Fighter::artifact_holder(Side::Left, left.artifact.clone()));
        let right_holder =
            fighters.insert(Fighter::artifact_holder(Side::Right, right.artifact.clone()));

        let lanes = vec![Lane::new(); settings.lanes];
        let mut queue = VecDeque::new();
        queue.push_back(FlowStep::DeployWave {
            lanes: (0..settings.lanes).collect(),
        });
        queue.push_back(FlowStep::ResolveSummons);
        queue.push_back(FlowStep::ResolveTriggers);

        Self {
            settings,
            order,
            left,
            right,
            lanes,
            fighters,
            index: AbilityIndex::new(),
            pending: Vec::new(),
            pending_summons: Vec::new(),
            left_holder,
            right_holder,
            queue,
            awaiting_setup: false,
            outcome: None,
            right_money_init,
            shake: 0,
            score: ScoreBoard::default(),
            limits: BattleLimits::default(),
            events: Vec::new(),
            rng,
        }
    }

    pub fn status(&self) -> BattleStatus {
        if let Some(outcome) = self.outcome {
            BattleStatus::Finished(outcome)
        } else if self.awaiting_setup {
            BattleStatus::AwaitingSetup
        } else {
            BattleStatus::Running
        }
    }

    /// Run one flow step. Schedules a new round when the queue is empty,
    /// unless the round ceiling forces a draw first.
    pub fn tick(&mut self) -> BattleStatus {
        if self.outcome.is_some() || self.awaiting_setup {
            return self.status();
        }
        if self.queue.is_empty() {
            if !self.limits.record_round() {
                self.set_outcome(Outcome::Draw);
                return self.status();
            }
            self.queue.push_back(FlowStep::StepPhase);
            self.queue.push_back(FlowStep::AttackPhase { combo: false });
            self.queue.push_back(FlowStep::ResolveTriggers);
            self.queue.push_back(FlowStep::AttackPhase { combo: true });
            self.queue.push_back(FlowStep::ResolveTriggers);
        }
        if let Some(step) = self.queue.pop_front() {
            self.execute(step);
        }
        self.status()
    }

    /// Tick until the battle pauses for setup or finishes.
    pub fn run(&mut self) -> BattleStatus {
        loop {
            match self.tick() {
                BattleStatus::Running => continue,
                done => return done,
            }
        }
    }

    /// Answer the pre-battle artifact prompt. `use_artifact` arms the left
    /// artifact to fire on the next summon resolution; declining leaves it
    /// held, and the prompt returns on a later wave.
    pub fn confirm_setup(&mut self, use_artifact: bool) -> Result<(), BattleError> {
        if !self.awaiting_setup {
            return Err(BattleError::NotAwaitingSetup);
        }
        if let Some(holder) = self.fighters.get_mut(self.left_holder) {
            holder.artifact_used = if use_artifact { 0 } else { -1 };
        }
        self.awaiting_setup = false;
        Ok(())
    }

    fn execute(&mut self, step: FlowStep) {
        log::debug!("executing {step:?}");
        match step {
            FlowStep::DeployWave { lanes } => self.deploy_wave(&lanes),
            FlowStep::ResolveSummons => self.resolve_summons(),
            FlowStep::ResolveTriggers => self.resolve_triggers(),
            FlowStep::CheckLanes => self.check_lanes(),
            FlowStep::StepPhase => self.step_phase(),
            FlowStep::AttackPhase { combo } => self.attack_phase(combo),
        }
    }

    /// Each side summons random affordable lines into the wave's lanes,
    /// always into the emptiest lane with room, until money or space is
    /// exhausted.
    fn deploy_wave(&mut self, wave: &[usize]) {
        let mut summoned_any = false;
        for side in [Side::Left, Side::Right] {
            loop {
                let lane = wave
                    .iter()
                    .copied()
                    .filter(|&l| {
                        self.lanes[l].side(side).len() < self.settings.lane_capacity
                    })
                    .min_by_key(|&l| self.lanes[l].side(side).len());
                let lane = match lane {
                    Some(l) => l,
                    None => break,
                };
                let space = self.settings.lane_capacity - self.lanes[lane].side(side).len();
                let line = match side {
                    Side::Left => self.left.random_line(space, self.rng.as_mut()),
                    Side::Right => self.right.random_line(space, self.rng.as_mut()),
                };
                let line = match line {
                    Some(l) => l,
                    None => break,
                };
                if !summoned_any {
                    summoned_any = true;
                    self.events.push(BattleEvent::Sound {
                        cue: SoundCue::Summon,
                    });
                }
                let back = self.lanes[lane].side(side).len();
                let ids = self.summon_line(lane, side, &line, back, true);
                self.pending_summons.extend(ids);
                self.events.push(BattleEvent::Pause { seconds: 0.2 });
            }
        }
        if summoned_any {
            self.events.push(BattleEvent::Pause { seconds: 1.0 });
            self.events.push(BattleEvent::SoundStop);
        }

        // Pause for the player's artifact decision while it is undecided
        // or armed but not yet fired.
        let gate = self.left.artifact.is_some()
            && self
                .fighters
                .get(self.left_holder)
                .map_or(false, |f| f.artifact_used < 1);
        if gate {
            self.awaiting_setup = true;
        }
    }

    /// Instantiate a line's units into a lane at `index`, registering their
    /// abilities. Units that do not fit are dropped, but the line's full
    /// price is still charged when `charge_money` is set.
    pub(crate) fn summon_line(
        &mut self,
        lane: usize,
        side: Side,
        line: &Line,
        index: usize,
        charge_money: bool,
    ) -> Vec<FighterId> {
        let mut ids = Vec::new();
        let mut at = index.min(self.lanes[lane].side(side).len());
        for unit in &line.units {
            if self.lanes[lane].side(side).len() >= self.settings.lane_capacity {
                break;
            }
            if !self.limits.record_summon() {
                break;
            }
            let fighter = Fighter::from_unit(unit, side);
            let abilities = fighter.abilities.clone();
            let id = self.fighters.insert(fighter);
            self.index.register(id, &abilities);
            self.lanes[lane].side_mut(side).insert(at, id);
            self.events.push(BattleEvent::Summoned {
                fighter: id,
                side,
                lane,
                index: at,
            });
            ids.push(id);
            at += 1;
        }
        if !ids.is_empty() {
            // Fighters behind the insertion point shifted back.
            let shifted: Vec<FighterId> = self.lanes[lane].side(side)[at..].to_vec();
            for (offset, id) in shifted.into_iter().enumerate() {
                self.events.push(BattleEvent::Moved {
                    fighter: id,
                    side,
                    lane,
                    index: at + offset,
                    animate: true,
                    charging: false,
                });
            }
        }
        if charge_money {
            self.squad_mut(side).money -= line.total_price();
        }
        ids
    }

    /// Fire the artifact causes that are due, then a summon cause for every
    /// fighter the last wave placed.
    fn resolve_summons(&mut self) {
        let left_armed = self
            .fighters
            .get(self.left_holder)
            .map_or(false, |f| f.artifact.is_some() && f.artifact_used == 0);
        if left_armed {
            if let Some(holder) = self.fighters.get_mut(self.left_holder) {
                holder.artifact_used = 1;
            }
            self.trigger_abilities(CauseType::Artifact, None, Some(self.left_holder));
        }
        // The right side has no one to prompt; its artifact always fires on
        // the first resolution.
        let right_due = self
            .fighters
            .get(self.right_holder)
            .map_or(false, |f| f.artifact.is_some() && f.artifact_used < 1);
        if right_due {
            if let Some(holder) = self.fighters.get_mut(self.right_holder) {
                holder.artifact_used = 1;
            }
            self.trigger_abilities(CauseType::Artifact, None, Some(self.right_holder));
        }

        let summons = std::mem::take(&mut self.pending_summons);
        for id in summons {
            if self.fighters.contains(id) {
                self.trigger_abilities(CauseType::Summon, None, Some(id));
            }
        }
        if !self.pending.is_empty() {
            self.queue.push_front(FlowStep::ResolveTriggers);
        }
    }

    fn resolve_triggers(&mut self) {
        self.activate_triggers();
        let refill = self.clean();
        self.queue.push_front(FlowStep::CheckLanes);
        if let Some(lanes) = refill {
            self.queue.push_front(FlowStep::ResolveSummons);
            self.queue.push_front(FlowStep::DeployWave { lanes });
        }
    }

    /// Start-of-round bookkeeping plus the step cause, with a bonus cause
    /// a quarter of the time.
    pub(crate) fn step_phase(&mut self) {
        let ids: Vec<FighterId> = self.fighters.iter().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(f) = self.fighters.get_mut(id) {
                f.has_combo = false;
            }
        }
        self.trigger_abilities(CauseType::Step, None, None);
        if self.rng.value() <= 0.25 {
            self.trigger_abilities(CauseType::Bonus, None, None);
        }
        if !self.pending.is_empty() {
            self.queue.push_front(FlowStep::ResolveTriggers);
        }
    }

    /// The front fighters of every fighting lane trade blows. In a combo
    /// pass only fighters that earned a follow-up swing; otherwise slow
    /// fighters sit out half the time.
    pub(crate) fn attack_phase(&mut self, combo: bool) {
        if !combo {
            self.score.attacks += 1;
        }
        let fighting: Vec<usize> = (0..self.lanes.len())
            .filter(|&l| self.lanes[l].fighting())
            .collect();

        let mut any_attacking = false;
        for &lane in &fighting {
            for side in [Side::Left, Side::Right] {
                let id = self.lanes[lane].side(side)[0];
                let (slow, combo_trait, has_combo) = match self.fighters.get(id) {
                    Some(f) => (f.slow, f.combo, f.has_combo),
                    None => continue,
                };
                let attacking = if combo {
                    has_combo
                } else if slow && self.rng.value() <= 0.5 {
                    self.events.push(BattleEvent::FloatingText {
                        fighter: id,
                        text: "SLOW".to_string(),
                    });
                    false
                } else {
                    true
                };
                if let Some(f) = self.fighters.get_mut(id) {
                    f.is_attacking = attacking;
                    if combo {
                        f.has_combo = false;
                    } else if attacking && combo_trait {
                        f.has_combo = true;
                    }
                }
                // The marker shows when the charge is spent, not earned.
                if combo && attacking {
                    self.events.push(BattleEvent::FloatingText {
                        fighter: id,
                        text: "COMBO".to_string(),
                    });
                }
                if attacking {
                    any_attacking = true;
                    self.events.push(BattleEvent::Moved {
                        fighter: id,
                        side,
                        lane,
                        index: 0,
                        animate: true,
                        charging: true,
                    });
                    self.events.push(BattleEvent::Animation {
                        fighter: id,
                        state: AnimationState::Attacking,
                    });
                }
            }
        }
        if !any_attacking {
            return;
        }

        self.events.push(BattleEvent::Sound {
            cue: SoundCue::Charge,
        });
        self.events.push(BattleEvent::Pause { seconds: 0.6 });
        self.shake = 0;

        for &lane in &fighting {
            let left = self.lanes[lane].left[0];
            let right = self.lanes[lane].right[0];
            self.fight(left, right);
        }

        for &lane in &fighting {
            for side in [Side::Left, Side::Right] {
                let id = self.lanes[lane].side(side)[0];
                let (was_attacking, alive) = match self.fighters.get(id) {
                    Some(f) => (f.is_attacking, f.is_alive()),
                    None => continue,
                };
                if was_attacking {
                    self.events.push(BattleEvent::Moved {
                        fighter: id,
                        side,
                        lane,
                        index: 0,
                        animate: true,
                        charging: false,
                    });
                }
                if alive {
                    self.events.push(BattleEvent::Animation {
                        fighter: id,
                        state: AnimationState::Idle,
                    });
                }
                if let Some(f) = self.fighters.get_mut(id) {
                    f.is_attacking = false;
                }
            }
        }

        if self.shake > 0 {
            self.events.push(BattleEvent::Sound {
                cue: SoundCue::Damage {
                    magnitude: self.shake,
                },
            });
        }
        self.events.push(BattleEvent::Pause { seconds: 0.6 });
    }

    /// Remove the dead, compact every lane, and report which lanes need a
    /// refill wave because a refillable side stands empty.
    pub(crate) fn clean(&mut self) -> Option<Vec<usize>> {
        for lane in 0..self.lanes.len() {
            for side in [Side::Left, Side::Right] {
                let before = self.lanes[lane].side(side).clone();
                let mut survivors = Vec::with_capacity(before.len());
                for id in before {
                    let alive = self.fighters.get(id).map_or(false, |f| f.is_alive());
                    if alive {
                        survivors.push(id);
                    } else {
                        self.events.push(BattleEvent::Animation {
                            fighter: id,
                            state: AnimationState::Dead,
                        });
                        if side.is_left() {
                            self.score.casualties += 1;
                        }
                        self.index.unregister(id);
                        self.fighters.remove(id);
                    }
                }
                let moved = survivors.len() != self.lanes[lane].side(side).len()
                    || self.lanes[lane].fighter_retreated;
                *self.lanes[lane].side_mut(side) = survivors;
                if moved {
                    let repositioned = self.lanes[lane].side(side).clone();
                    for (index, id) in repositioned.into_iter().enumerate() {
                        self.events.push(BattleEvent::Moved {
                            fighter: id,
                            side,
                            lane,
                            index,
                            animate: true,
                            charging: false,
                        });
                    }
                }
            }
            self.lanes[lane].fighter_retreated = false;
        }

        // Retreated fighters left the lanes earlier; drop them for real now.
        let retreated: Vec<FighterId> = self
            .fighters
            .iter()
            .filter(|(_, f)| f.retreated)
            .map(|(id, _)| id)
            .collect();
        for id in retreated {
            self.fighters.remove(id);
        }

        let need: Vec<usize> = (0..self.lanes.len())
            .filter(|&l| !self.lanes[l].fighting() && self.lane_can_continue(l))
            .collect();
        if need.is_empty() {
            None
        } else {
            Some(need)
        }
    }

    /// A lane can continue while each side either has fighters in it or
    /// could still summon some.
    pub(crate) fn lane_can_continue(&self, lane: usize) -> bool {
        let lane = &self.lanes[lane];
        let left_ok =
            !lane.left.is_empty() || self.left.can_summon(self.settings.lane_capacity);
        let right_ok =
            !lane.right.is_empty() || self.right.can_summon(self.settings.lane_capacity);
        left_ok && right_ok
    }

    /// Retire dead-end lanes, refunding their fighters, and settle the
    /// battle once no lane can go on. With a single lane left, exhaustion
    /// ends the battle on a money comparison after full refunds.
    pub(crate) fn check_lanes(&mut self) {
        if self.outcome.is_some() {
            return;
        }

        for lane in (0..self.lanes.len()).rev() {
            if self.lanes.len() <= 1 {
                break;
            }
            if !self.lane_can_continue(lane) {
                self.retreat_all(lane, Side::Left);
                self.retreat_all(lane, Side::Right);
                self.lanes.remove(lane);
            }
        }

        if self.lanes.is_empty() {
            self.set_outcome(Outcome::Draw);
            return;
        }
        if self.lanes.len() > 1 {
            return;
        }

        if self.lane_can_continue(0) {
            if !self.lanes[0].fighting() {
                self.queue.push_front(FlowStep::ResolveSummons);
                self.queue.push_front(FlowStep::DeployWave { lanes: vec![0] });
            }
        } else {
            self.retreat_all(0, Side::Left);
            self.retreat_all(0, Side::Right);
            self.events.push(BattleEvent::Pause { seconds: 0.5 });
            let outcome = match self.left.money.cmp(&self.right.money) {
                std::cmp::Ordering::Greater => Outcome::LeftWin,
                std::cmp::Ordering::Less => Outcome::RightWin,
                std::cmp::Ordering::Equal => Outcome::Draw,
            };
            self.set_outcome(outcome);
        }
    }

    fn set_outcome(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        let cue = match outcome {
            Outcome::LeftWin => {
                self.score.rounds_won += 1;
                SoundCue::Victory
            }
            Outcome::RightWin => SoundCue::Fail,
            Outcome::Draw => {
                // A draw costs the right side nothing.
                self.right.money = self.right_money_init;
                SoundCue::Draw
            }
        };
        self.events.push(BattleEvent::Sound { cue });
        self.events.push(BattleEvent::BattleEnd { outcome });
        log::info!(
            "battle over after {} rounds: {outcome:?}",
            self.limits.rounds()
        );
    }

    /// Where a fighter currently stands. Artifact holders sit outside the
    /// lanes and report their side's front corner for reference purposes.
    pub fn location_of(&self, id: FighterId) -> Option<Location> {
        if let Some(f) = self.fighters.get(id) {
            if f.is_artifact {
                return Some(Location {
                    side: f.side,
                    lane: 0,
                    index: 0,
                });
            }
        }
        for (lane, l) in self.lanes.iter().enumerate() {
            for side in [Side::Left, Side::Right] {
                if let Some(index) = l.side(side).iter().position(|&x| x == id) {
                    return Some(Location { side, lane, index });
                }
            }
        }
        None
    }

    pub fn fighter_at(&self, loc: Location) -> Option<FighterId> {
        self.lanes.get(loc.lane)?.side(loc.side).get(loc.index).copied()
    }

    pub fn squad(&self, side: Side) -> &Squad {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn squad_mut(&mut self, side: Side) -> &mut Squad {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn fighter(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.get(id)
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Hand the accumulated event stream to the driver and clear it.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}
