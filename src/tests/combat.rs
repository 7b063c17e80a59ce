//! Damage pipeline and front-fighter exchange.

use super::helpers::*;
use crate::events::BattleEvent;
use crate::lane::Side;

#[test]
fn armor_reduces_damage() {
    let mut battle = arena(1);
    let source = place(&mut battle, Side::Left, 0, unit("source", 10, 0, 10));
    let mut tough = unit("tough", 10, 0, 10);
    tough.armor = 2;
    let target = place(&mut battle, Side::Right, 0, tough);

    battle.deal_damage(source, target, 5);
    assert_eq!(health_of(&battle, target), 7);
}

#[test]
fn armor_deflects_weak_hits() {
    let mut battle = arena(1);
    let source = place(&mut battle, Side::Left, 0, unit("source", 10, 0, 10));
    let mut tough = unit("tough", 10, 0, 10);
    tough.armor = 5;
    let target = place(&mut battle, Side::Right, 0, tough);

    battle.deal_damage(source, target, 2);
    assert_eq!(health_of(&battle, target), 10);
    assert!(battle.events().iter().any(|e| matches!(
        e,
        BattleEvent::FloatingText { fighter, text } if *fighter == target && text == "DEFLECTED"
    )));
}

#[test]
fn morph_always_crits_plain_targets() {
    let mut battle = arena(1);
    let mut shifty = unit("shifty", 10, 0, 10);
    shifty.morph = true;
    let source = place(&mut battle, Side::Left, 0, shifty);
    let mut tough = unit("tough", 20, 0, 10);
    tough.armor = 1;
    let target = place(&mut battle, Side::Right, 0, tough);

    // Two instances of 3, armor subtracted once.
    battle.deal_damage(source, target, 3);
    assert_eq!(health_of(&battle, target), 15);
    assert!(battle.events().iter().any(|e| matches!(
        e,
        BattleEvent::DamageNumber { critical: true, .. }
    )));
}

#[test]
fn morph_targets_never_get_critted_by_plain_sources() {
    let mut battle = arena(1);
    let source = place(&mut battle, Side::Left, 0, unit("source", 10, 0, 10));
    let mut shifty = unit("shifty", 100, 0, 10);
    shifty.morph = true;
    let target = place(&mut battle, Side::Right, 0, shifty);

    for _ in 0..50 {
        battle.deal_damage(source, target, 1);
    }
    assert_eq!(health_of(&battle, target), 50);
}

#[test]
fn block_consumes_a_charge_per_hit() {
    let mut battle = arena(1);
    let source = place(&mut battle, Side::Left, 0, unit("source", 10, 0, 10));
    let mut wary = unit("wary", 10, 0, 10);
    wary.block = 1;
    let target = place(&mut battle, Side::Right, 0, wary);

    battle.deal_damage(source, target, 4);
    assert_eq!(health_of(&battle, target), 10);
    assert_eq!(battle.fighter(target).unwrap().block, 0);

    battle.deal_damage(source, target, 4);
    assert_eq!(health_of(&battle, target), 6);
}

#[test]
fn anti_block_ignores_charges() {
    let mut battle = arena(1);
    let mut piercing = unit("piercing", 10, 0, 10);
    piercing.anti_block = true;
    let source = place(&mut battle, Side::Left, 0, piercing);
    let mut wary = unit("wary", 10, 0, 10);
    wary.block = 3;
    let target = place(&mut battle, Side::Right, 0, wary);

    battle.deal_damage(source, target, 4);
    assert_eq!(health_of(&battle, target), 6);
    assert_eq!(battle.fighter(target).unwrap().block, 3);
}

#[test]
fn agile_dodges_at_its_advertised_rate() {
    let mut battle = arena(7);
    let source = place(&mut battle, Side::Left, 0, unit("source", 10, 0, 10));
    // Never critted, so exactly one dodge roll per hit at 3/4 odds.
    let mut nimble = unit("nimble", 10_000, 0, 10);
    nimble.agile = 3;
    nimble.morph = true;
    let target = place(&mut battle, Side::Right, 0, nimble);

    for _ in 0..400 {
        battle.deal_damage(source, target, 1);
    }
    let landed = 10_000 - health_of(&battle, target);
    let dodged = 400 - landed;
    assert!((240..=360).contains(&dodged), "dodged {dodged} of 400");
}

#[test]
fn anti_agile_never_misses() {
    let mut battle = arena(1);
    let mut tracking = unit("tracking", 10, 0, 10);
    tracking.anti_agile = true;
    let source = place(&mut battle, Side::Left, 0, tracking);
    let mut nimble = unit("nimble", 100, 0, 10);
    nimble.agile = 100;
    nimble.morph = true;
    let target = place(&mut battle, Side::Right, 0, nimble);

    for _ in 0..50 {
        battle.deal_damage(source, target, 1);
    }
    assert_eq!(health_of(&battle, target), 50);
}

fn arm(battle: &mut crate::battle::Battle, id: crate::fighter::FighterId) {
    battle.fighters.get_mut(id).unwrap().is_attacking = true;
}

#[test]
fn fast_kill_interrupts_retaliation() {
    let mut battle = arena(1);
    let mut quick = unit("quick", 10, 5, 10);
    quick.fast = true;
    let left = place(&mut battle, Side::Left, 0, quick);
    let mut victim = unit("victim", 3, 9, 10);
    victim.morph = true;
    let right = place(&mut battle, Side::Right, 0, victim);
    arm(&mut battle, left);
    arm(&mut battle, right);

    battle.fight(left, right);
    assert!(!battle.fighter(right).unwrap().is_alive());
    assert_eq!(health_of(&battle, left), 10);
    assert!(battle.events().iter().any(|e| matches!(
        e,
        BattleEvent::FloatingText { fighter, text } if *fighter == left && text == "FAST"
    )));
}

#[test]
fn fast_on_both_sides_lets_the_dying_strike_land() {
    let mut battle = arena(1);
    let mut quick = unit("quick", 10, 5, 10);
    quick.fast = true;
    let left = place(&mut battle, Side::Left, 0, quick);
    let mut rival = unit("rival", 3, 4, 10);
    rival.fast = true;
    rival.morph = true;
    let right = place(&mut battle, Side::Right, 0, rival);
    arm(&mut battle, left);
    arm(&mut battle, right);

    battle.fight(left, right);
    assert!(!battle.fighter(right).unwrap().is_alive());
    // The rival dies to the first strike but is fast itself, so its
    // critical still lands on the way down.
    assert_eq!(health_of(&battle, left), 2);
    assert!(!battle.events().iter().any(|e| matches!(
        e,
        BattleEvent::FloatingText { text, .. } if text == "FAST"
    )));
}

#[test]
fn lethal_exchange_still_trades_without_fast() {
    let mut battle = arena(1);
    let mut bruiser = unit("bruiser", 10, 5, 10);
    bruiser.morph = true;
    let left = place(&mut battle, Side::Left, 0, bruiser);
    let mut victim = unit("victim", 3, 9, 10);
    victim.morph = true;
    let right = place(&mut battle, Side::Right, 0, victim);
    arm(&mut battle, left);
    arm(&mut battle, right);

    battle.fight(left, right);
    assert!(!battle.fighter(right).unwrap().is_alive());
    assert_eq!(health_of(&battle, left), 1);
}

#[test]
fn fast_defender_strikes_first() {
    let mut battle = arena(1);
    let mut victim = unit("victim", 3, 9, 10);
    victim.morph = true;
    let left = place(&mut battle, Side::Left, 0, victim);
    let mut quick = unit("quick", 10, 5, 10);
    quick.fast = true;
    let right = place(&mut battle, Side::Right, 0, quick);
    arm(&mut battle, left);
    arm(&mut battle, right);

    battle.fight(left, right);
    assert!(!battle.fighter(left).unwrap().is_alive());
    assert_eq!(health_of(&battle, right), 10);
}

#[test]
fn non_attacking_fighter_deals_nothing() {
    let mut battle = arena(1);
    let mut bruiser = unit("bruiser", 10, 5, 10);
    bruiser.morph = true;
    let left = place(&mut battle, Side::Left, 0, bruiser);
    let mut idle = unit("idle", 10, 5, 10);
    idle.morph = true;
    let right = place(&mut battle, Side::Right, 0, idle);
    arm(&mut battle, left);

    battle.fight(left, right);
    assert_eq!(health_of(&battle, right), 5);
    assert_eq!(health_of(&battle, left), 10);
}
