//! Shared fixtures for the battle tests.

use crate::battle::Battle;
use crate::config::{ActivationOrder, BattleSettings};
use crate::fighter::FighterId;
use crate::lane::Side;
use crate::rng::XorShiftRng;
use crate::squad::Squad;
use crate::types::{Colour, Line, Unit};

pub fn unit(name: &str, health: i32, attack: i32, price: i32) -> Unit {
    Unit::new(name, health, attack, price)
}

pub fn squad(name: &str, lines: Vec<Line>, money: i32) -> Squad {
    let mut squad = Squad::new(name, Colour::neutral("gray"), lines, money);
    // `Battle::new` derives spendable money from `start_money`; tests that use
    // a squad outside a battle need it set up front.
    squad.money = money;
    squad
}

pub fn battle(left: Squad, right: Squad, seed: u64) -> Battle {
    Battle::new(
        BattleSettings::default(),
        ActivationOrder::default(),
        left,
        right,
        Box::new(XorShiftRng::seed_from_u64(seed)),
    )
}

pub fn battle_with(settings: BattleSettings, left: Squad, right: Squad, seed: u64) -> Battle {
    Battle::new(
        settings,
        ActivationOrder::default(),
        left,
        right,
        Box::new(XorShiftRng::seed_from_u64(seed)),
    )
}

/// An arena with no lines on either side so nothing deploys on its own;
/// tests place fighters by hand.
pub fn arena(seed: u64) -> Battle {
    battle(squad("left", vec![], 0), squad("right", vec![], 0), seed)
}

/// Place one fighter at the back of a lane, bypassing money.
pub fn place(battle: &mut Battle, side: Side, lane: usize, unit: Unit) -> FighterId {
    let back = battle.lanes[lane].side(side).len();
    let ids = battle.summon_line(lane, side, &Line::new(vec![unit]), back, false);
    assert_eq!(ids.len(), 1, "fighter did not fit in lane {lane}");
    ids[0]
}

pub fn health_of(battle: &Battle, id: FighterId) -> i32 {
    battle.fighter(id).map(|f| f.health).unwrap_or(i32::MIN)
}
