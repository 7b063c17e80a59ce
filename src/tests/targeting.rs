//! Effect target selection.

use super::helpers::*;
use crate::battle::Battle;
use crate::config::BattleSettings;
use crate::fighter::FighterId;
use crate::lane::Side;
use crate::types::{
    Ability, Artifact, Cause, CauseFilter, CauseType, EffectFilter, EffectLane, EffectUnitType,
};

fn select(
    battle: &mut Battle,
    filter: &EffectFilter,
    owner: FighterId,
    cause_source: Option<FighterId>,
    cause_target: Option<FighterId>,
) -> Vec<FighterId> {
    let reference = battle.location_of(owner).unwrap();
    battle.select_targets(filter, owner, reference, cause_source, cause_target)
}

#[test]
fn all_in_lane_respects_side_flags() {
    let mut battle = arena(1);
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    let ally = place(&mut battle, Side::Left, 0, unit("ally", 5, 1, 10));
    let enemy = place(&mut battle, Side::Right, 0, unit("enemy", 5, 1, 10));

    // The owner is stripped from the pool picks and re-appended through
    // its own flag, so it always comes last.
    let allies = EffectFilter::new(EffectUnitType::All, EffectLane::This).allies_only();
    assert_eq!(select(&mut battle, &allies, owner, None, None), vec![ally, owner]);

    let enemies = EffectFilter::new(EffectUnitType::All, EffectLane::This).enemies_only();
    assert_eq!(select(&mut battle, &enemies, owner, None, None), vec![enemy]);

    let others = EffectFilter::new(EffectUnitType::All, EffectLane::This)
        .allies_only()
        .exclude_self();
    assert_eq!(select(&mut battle, &others, owner, None, None), vec![ally]);
}

#[test]
fn dead_fighters_are_skipped_unless_asked_for() {
    let mut battle = arena(1);
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    let corpse = place(&mut battle, Side::Right, 0, unit("corpse", 5, 1, 10));
    battle.fighters.get_mut(corpse).unwrap().health = 0;

    let living = EffectFilter::new(EffectUnitType::All, EffectLane::This).enemies_only();
    assert!(select(&mut battle, &living, owner, None, None).is_empty());

    let anyone = EffectFilter::new(EffectUnitType::All, EffectLane::This)
        .enemies_only()
        .include_dead();
    assert_eq!(select(&mut battle, &anyone, owner, None, None), vec![corpse]);
}

#[test]
fn nearest_ahead_walks_own_column_then_the_enemy() {
    let mut battle = arena(1);
    let a = place(&mut battle, Side::Left, 0, unit("a", 5, 1, 10));
    let b = place(&mut battle, Side::Left, 0, unit("b", 5, 1, 10));
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    let e = place(&mut battle, Side::Right, 0, unit("e", 5, 1, 10));

    let filter =
        EffectFilter::new(EffectUnitType::NearestAhead, EffectLane::This).exclude_self().count(3);
    // Index 1, then index 0, then the enemy front.
    assert_eq!(select(&mut battle, &filter, owner, None, None), vec![b, a, e]);
}

#[test]
fn front_picks_the_closest_own_columns() {
    let mut battle = arena(1);
    let a = place(&mut battle, Side::Left, 0, unit("a", 5, 1, 10));
    place(&mut battle, Side::Left, 0, unit("b", 5, 1, 10));
    let owner = place(&mut battle, Side::Left, 1, unit("owner", 5, 1, 10));

    // The frontmost owner fills one of the two slots before the self pass
    // drops it again.
    let filter = EffectFilter::new(EffectUnitType::Front, EffectLane::All)
        .allies_only()
        .exclude_self()
        .count(2);
    assert_eq!(select(&mut battle, &filter, owner, None, None), vec![a]);

    let with_self = EffectFilter::new(EffectUnitType::Front, EffectLane::All)
        .allies_only()
        .count(2);
    assert_eq!(select(&mut battle, &with_self, owner, None, None), vec![a, owner]);
}

#[test]
fn front_never_reaches_the_enemy_side() {
    let mut battle = arena(1);
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    place(&mut battle, Side::Right, 0, unit("enemy", 5, 1, 10));

    let filter = EffectFilter::new(EffectUnitType::Front, EffectLane::All).enemies_only();
    assert!(select(&mut battle, &filter, owner, None, None).is_empty());
}

#[test]
fn random_returns_distinct_fighters_up_to_count() {
    let mut battle = arena(11);
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    for lane in 0..3 {
        place(&mut battle, Side::Right, lane, unit("e", 5, 1, 10));
    }

    let filter = EffectFilter::new(EffectUnitType::Random, EffectLane::Any)
        .enemies_only()
        .count(2);
    let picked = select(&mut battle, &filter, owner, None, None);
    assert_eq!(picked.len(), 2);
    assert_ne!(picked[0], picked[1]);
}

#[test]
fn per_lane_selection_takes_one_from_each_lane() {
    let mut battle = arena(1);
    let mut fronts = Vec::new();
    fronts.push(place(&mut battle, Side::Left, 0, unit("front", 5, 1, 10)));
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    for lane in 1..3 {
        fronts.push(place(&mut battle, Side::Left, lane, unit("front", 5, 1, 10)));
        place(&mut battle, Side::Left, lane, unit("backrow", 5, 1, 10));
    }

    // Lane scope `All` applies the count per lane rather than to the pool.
    let filter = EffectFilter::new(EffectUnitType::Front, EffectLane::All)
        .allies_only()
        .exclude_self()
        .count(1);
    let picked = select(&mut battle, &filter, owner, None, None);
    assert_eq!(picked, fronts);
}

#[test]
fn source_and_target_refer_to_the_cause() {
    let mut battle = arena(1);
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    let striker = place(&mut battle, Side::Right, 0, unit("striker", 5, 1, 10));
    let victim = place(&mut battle, Side::Left, 0, unit("victim", 5, 1, 10));

    let source = EffectFilter::new(EffectUnitType::Source, EffectLane::Any).exclude_self();
    assert_eq!(
        select(&mut battle, &source, owner, Some(striker), Some(victim)),
        vec![striker]
    );
    let target = EffectFilter::new(EffectUnitType::Target, EffectLane::Any).exclude_self();
    assert_eq!(
        select(&mut battle, &target, owner, Some(striker), Some(victim)),
        vec![victim]
    );
    assert!(select(&mut battle, &source, owner, None, None).is_empty());

    // Directly-named fighters skip the side flags; only the dead gate
    // applies to them.
    let any_source = EffectFilter::new(EffectUnitType::Source, EffectLane::Any).enemies_only();
    assert_eq!(
        select(&mut battle, &any_source, owner, Some(victim), None),
        vec![victim]
    );
}

#[test]
fn artifact_holders_are_targeted_directly() {
    let banner = Artifact::new(
        "banner",
        Ability::new(
            "bless",
            Cause::new(CauseType::Artifact, CauseFilter::any(), CauseFilter::any()),
            vec![],
        ),
    );
    let left = squad("left", vec![], 10).with_artifact(banner);
    let right = squad("right", vec![], 10);
    let mut battle = battle_with(BattleSettings::default(), left, right, 1);
    let holder = battle
        .fighters
        .iter()
        .find(|(_, f)| f.is_artifact && f.side == Side::Left)
        .map(|(id, _)| id)
        .unwrap();
    let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
    place(&mut battle, Side::Left, 0, unit("bystander", 5, 1, 10));

    // The holder stands outside the lanes; a cause aimed at it anchors the
    // selection on the holder itself, not on whoever holds the front.
    let target = EffectFilter::new(EffectUnitType::Target, EffectLane::Any);
    assert_eq!(
        select(&mut battle, &target, owner, None, Some(holder)),
        vec![holder]
    );
    let excluded = EffectFilter::new(EffectUnitType::Target, EffectLane::Any).exclude_self();
    assert!(select(&mut battle, &excluded, owner, None, Some(holder)).is_empty());
}

#[test]
fn target_self_always_reaches_the_owner() {
    // Whatever the random trim lands on, the owner joins the selection
    // through its own flag.
    for seed in 1..6 {
        let mut battle = arena(seed);
        let owner = place(&mut battle, Side::Left, 0, unit("owner", 5, 1, 10));
        let ally = place(&mut battle, Side::Left, 0, unit("ally", 5, 1, 10));

        let filter = EffectFilter::new(EffectUnitType::Random, EffectLane::This).allies_only();
        let picked = select(&mut battle, &filter, owner, None, None);
        assert!(
            picked == vec![owner] || picked == vec![ally, owner],
            "seed {seed}: {picked:?}"
        );
    }
}
