//! The damage pipeline and the front-fighter exchange.

use crate::battle::Battle;
use crate::events::BattleEvent;
use crate::fighter::FighterId;
use crate::types::CauseType;

impl Battle {
    /// Resolve one instance of `damage` from `source` against `target`,
    /// running it through the critical, dodge, block, and armor layers in
    /// that order before any health is touched.
    pub(crate) fn deal_damage(&mut self, source: FighterId, target: FighterId, damage: i32) {
        let (s_morph, s_anti_agile, s_anti_block, s_side) = match self.fighters.get(source) {
            Some(f) => (f.morph, f.anti_agile, f.anti_block, f.side),
            None => return,
        };
        let (t_morph, t_agile, t_side) = match self.fighters.get(target) {
            Some(f) => (f.morph, f.agile, f.side),
            None => return,
        };

        // A hit lands as `multi` stacked instances; the layers below peel
        // instances off one at a time.
        let mut multi = 1;
        let advantage = self
            .squad(s_side)
            .colour
            .advantage(&self.squad(t_side).colour);
        // Morph guarantees a critical against non-morph targets and denies
        // colour criticals when only the target has it.
        let critical = (s_morph && !t_morph)
            || ((s_morph || !t_morph) && self.rng.value() <= advantage);
        if critical {
            multi = 2;
            if s_side.is_left() {
                self.score.criticals += 1;
            }
        }

        if !s_anti_agile {
            for _ in 0..multi {
                if self.rng.value() * (t_agile + 1) as f32 > 1.0 {
                    multi -= 1;
                    self.events.push(BattleEvent::FloatingText {
                        fighter: target,
                        text: "DODGED".to_string(),
                    });
                }
            }
        }

        while multi > 0 && !s_anti_block {
            let blocked = match self.fighters.get_mut(target) {
                Some(f) if f.block > 0 => {
                    f.block -= 1;
                    true
                }
                _ => false,
            };
            if !blocked {
                break;
            }
            multi -= 1;
            if t_side.is_left() {
                self.score.blocks += 1;
            }
            self.events.push(BattleEvent::FloatingText {
                fighter: target,
                text: "BLOCKED".to_string(),
            });
            // A spent charge is itself a triggering event.
            self.trigger_abilities(CauseType::Block, Some(source), Some(target));
        }

        if multi == 0 {
            return;
        }

        let dealt = damage * multi - self.fighters.get(target).map_or(0, |f| f.armor);
        if dealt > 0 {
            let alive = match self.fighters.get_mut(target) {
                Some(f) => {
                    f.health -= dealt;
                    f.is_alive()
                }
                None => return,
            };
            self.shake += dealt;
            if s_side.is_left() {
                self.score.damage_dealt += dealt;
            }
            self.events.push(BattleEvent::DamageNumber {
                fighter: target,
                amount: dealt,
                critical,
            });
            let cause = if alive {
                CauseType::Nonlethal
            } else {
                CauseType::Death
            };
            self.trigger_abilities(cause, Some(source), Some(target));
        } else {
            self.events.push(BattleEvent::FloatingText {
                fighter: target,
                text: "DEFLECTED".to_string(),
            });
        }
    }

    /// The front fighters of a fighting lane trade blows. Each strike only
    /// lands if its fighter committed to attacking this pass. Both strikes
    /// land even when the first one kills, unless the first attacker is
    /// fast, in which case a kill interrupts the retaliation.
    pub(crate) fn fight(&mut self, left: FighterId, right: FighterId) {
        let left_fast = self.fighters.get(left).map_or(false, |f| f.fast);
        let right_fast = self.fighters.get(right).map_or(false, |f| f.fast);
        let (first, second) = if right_fast && !left_fast {
            (right, left)
        } else {
            (left, right)
        };

        let (first_attack, first_fast, first_attacking) = match self.fighters.get(first) {
            Some(f) => (f.attack, f.fast, f.is_attacking),
            None => return,
        };
        if first_attacking {
            self.deal_damage(first, second, first_attack);
        }

        let (second_attack, second_attacking, second_fast, second_alive) =
            match self.fighters.get(second) {
                Some(f) => (f.attack, f.is_attacking, f.fast, f.is_alive()),
                None => return,
            };
        // A fast kill interrupts the retaliation, unless the victim is fast
        // too, in which case its dying strike still lands.
        if !first_fast || second_fast || second_alive {
            if second_attacking {
                self.deal_damage(second, first, second_attack);
            }
        } else if second_attacking {
            self.events.push(BattleEvent::FloatingText {
                fighter: first,
                text: "FAST".to_string(),
            });
        }
    }
}
