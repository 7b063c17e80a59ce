//! Line pricing, weighted line selection, colours, and data loading.

use super::helpers::*;
use crate::rng::{BattleRng, XorShiftRng};
use crate::types::{Colour, Line, Unit};

#[test]
fn line_price_adds_a_surcharge_per_extra_unit() {
    let one = Line::new(vec![unit("a", 1, 1, 10)]);
    assert_eq!(one.total_price(), 10);

    let three = Line::new(vec![
        unit("a", 1, 1, 10),
        unit("b", 1, 1, 10),
        unit("c", 1, 1, 10),
    ]);
    // 30 at a 20% surcharge.
    assert_eq!(three.total_price(), 36);

    let pair = Line::new(vec![unit("a", 1, 1, 7), unit("b", 1, 1, 4)]);
    // 11 * 1.1 floors to 12.
    assert_eq!(pair.total_price(), 12);
}

#[test]
fn cheap_lines_are_picked_proportionally_more_often() {
    let cheap = Line::new(vec![unit("cheap", 1, 1, 10)]);
    let dear = Line::new(vec![unit("dear", 1, 1, 40)]);
    let roster = squad("roster", vec![cheap, dear], 40);

    // Weights 1/10 and 1/40 make the cheap line a 4 in 5 pick.
    let mut rng = XorShiftRng::seed_from_u64(21);
    let mut cheap_picks = 0;
    for _ in 0..1000 {
        let line = roster.random_line(5, &mut rng).unwrap();
        if line.units[0].name == "cheap" {
            cheap_picks += 1;
        }
    }
    assert!(
        (740..=860).contains(&cheap_picks),
        "cheap picked {cheap_picks} of 1000"
    );
}

#[test]
fn unaffordable_and_oversized_lines_are_never_picked() {
    let big = Line::new(vec![
        unit("a", 1, 1, 1),
        unit("b", 1, 1, 1),
        unit("c", 1, 1, 1),
    ]);
    let dear = Line::new(vec![unit("dear", 1, 1, 100)]);
    let ok = Line::new(vec![unit("ok", 1, 1, 10)]);
    let roster = squad("roster", vec![big, dear, ok], 50);

    // With two slots the big line is oversized and the dear one is beyond
    // the budget, so only "ok" remains.
    assert!(roster.can_summon(2));
    let mut rng = XorShiftRng::seed_from_u64(3);
    for _ in 0..50 {
        let line = roster.random_line(2, &mut rng).unwrap();
        assert_eq!(line.units[0].name, "ok");
    }

    let broke = squad("broke", vec![Line::new(vec![unit("a", 1, 1, 10)])], 5);
    assert!(!broke.can_summon(5));
    let mut rng = XorShiftRng::seed_from_u64(3);
    assert!(broke.random_line(5, &mut rng).is_none());
}

#[test]
fn colour_advantage_is_one_directional() {
    let red = Colour::new("red", 1.0, 0.0, 0.0, 0.0, 0.0);
    let yellow = Colour::new("yellow", 0.0, 1.0, 0.0, 0.0, 0.0);
    assert_eq!(red.advantage(&yellow), 1.0);
    assert_eq!(yellow.advantage(&red), -1.0);

    let white = Colour::new("white", 0.0, 0.0, 0.0, 1.0, 0.0);
    let black = Colour::new("black", 0.0, 0.0, 0.0, 0.0, 1.0);
    // Gray colours are advantaged against their opposite, in both directions.
    assert_eq!(white.advantage(&black), 1.0);
    assert_eq!(black.advantage(&white), 1.0);
    assert_eq!(white.advantage(&white), 0.0);

    let gray = Colour::neutral("gray");
    assert_eq!(gray.advantage(&gray), 0.0);
}

#[test]
fn units_deserialize_with_trait_defaults() {
    let grunt: Unit =
        serde_json::from_str(r#"{"name":"grunt","health":4,"attack":2,"price":8}"#).unwrap();
    assert_eq!(grunt.name, "grunt");
    assert!(!grunt.fast && !grunt.slow && !grunt.morph);
    assert_eq!(grunt.agile, 0);
    assert!(grunt.abilities.is_empty());

    let scout: Unit = serde_json::from_str(
        r#"{"name":"scout","health":2,"attack":1,"price":5,"antiAgile":true,"agile":2}"#,
    )
    .unwrap();
    assert!(scout.anti_agile);
    assert_eq!(scout.agile, 2);
}

#[test]
fn value_draws_are_roughly_uniform() {
    let mut rng = XorShiftRng::seed_from_u64(8);
    let mut low = 0;
    for _ in 0..1000 {
        if rng.value() < 0.5 {
            low += 1;
        }
    }
    assert!((400..=600).contains(&low), "low draws {low} of 1000");
}
