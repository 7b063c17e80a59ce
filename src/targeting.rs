//! Fighter selection for cause matching and effect application.

use crate::battle::Battle;
use crate::fighter::FighterId;
use crate::lane::{Location, Side};
use crate::types::{CauseFilter, CauseLane, CauseUnitType, EffectFilter, EffectLane, EffectUnitType};

impl Battle {
    /// Lane indices a cause filter accepts, relative to the ability owner.
    pub(crate) fn lanes_possible(&self, lane: CauseLane, reference: Option<Location>) -> Vec<usize> {
        match (lane, reference) {
            (CauseLane::This, Some(loc)) if loc.lane < self.lanes.len() => vec![loc.lane],
            (CauseLane::This, Some(_)) => Vec::new(),
            _ => (0..self.lanes.len()).collect(),
        }
    }

    /// Fighters a cause filter accepts as the source or target of an event.
    /// `None` is always accepted, since many causes have no source at all.
    pub(crate) fn units_possible(
        &self,
        filter: &CauseFilter,
        reference: Option<Location>,
    ) -> Vec<Option<FighterId>> {
        let mut possible = vec![None];
        let lanes = self.lanes_possible(filter.lane, reference);
        match filter.unit {
            CauseUnitType::This => {
                if let Some(loc) = reference {
                    possible.extend(self.fighter_at(loc).map(Some));
                }
            }
            CauseUnitType::Enemy => {
                if let Some(loc) = reference {
                    for &lane in &lanes {
                        possible.extend(
                            self.lanes[lane]
                                .side(loc.side.opposite())
                                .iter()
                                .map(|&id| Some(id)),
                        );
                    }
                }
            }
            CauseUnitType::Any => {
                for &lane in &lanes {
                    possible.extend(self.lanes[lane].left.iter().map(|&id| Some(id)));
                    possible.extend(self.lanes[lane].right.iter().map(|&id| Some(id)));
                }
            }
        }
        possible
    }

    /// Lane indices an effect filter reaches from the owner's position.
    pub(crate) fn select_lanes(&self, lane: EffectLane, reference: Location) -> Vec<usize> {
        match lane {
            EffectLane::This if reference.lane < self.lanes.len() => vec![reference.lane],
            EffectLane::This => Vec::new(),
            EffectLane::All | EffectLane::Any => (0..self.lanes.len()).collect(),
        }
    }

    /// Resolve an effect filter into concrete fighters.
    ///
    /// `Source`/`Target` bypass the lane search and refer to the fighters of
    /// the triggering cause. A cause target holding an artifact pulls the
    /// whole selection to its side's front column and stands in for the
    /// owner in the self pass below, since the holder never stands in a
    /// lane. The owner itself never rides along with the pool picks; it is
    /// stripped from the selection and joins only through its own flag.
    pub(crate) fn select_targets(
        &mut self,
        filter: &EffectFilter,
        owner: FighterId,
        reference: Location,
        cause_source: Option<FighterId>,
        cause_target: Option<FighterId>,
    ) -> Vec<FighterId> {
        let mut anchor = owner;
        let mut reference = reference;
        if let Some(id) = cause_target {
            if let Some(f) = self.fighters.get(id).filter(|f| f.is_artifact) {
                anchor = id;
                reference = Location {
                    side: f.side,
                    lane: 0,
                    index: 0,
                };
            }
        }

        let mut result = match filter.unit {
            EffectUnitType::Source => cause_source
                .filter(|&id| self.survives_filter(filter, id))
                .into_iter()
                .collect(),
            EffectUnitType::Target => cause_target
                .filter(|&id| self.survives_filter(filter, id))
                .into_iter()
                .collect(),
            _ => {
                let lanes = self.select_lanes(filter.lane, reference);
                if filter.lane == EffectLane::Any {
                    // One pooled candidate list across every reachable lane.
                    let mut pool = Vec::new();
                    for &lane in &lanes {
                        for &id in
                            self.lanes[lane].left.iter().chain(self.lanes[lane].right.iter())
                        {
                            if self.filter_accepts(filter, reference.side, id) {
                                pool.push(id);
                            }
                        }
                    }
                    self.select_from_list(filter, reference, pool)
                } else {
                    // Candidate lists built and trimmed lane by lane.
                    let mut out = Vec::new();
                    for &lane in &lanes {
                        let mut pool = Vec::new();
                        for &id in
                            self.lanes[lane].left.iter().chain(self.lanes[lane].right.iter())
                        {
                            if self.filter_accepts(filter, reference.side, id) {
                                pool.push(id);
                            }
                        }
                        out.extend(self.select_from_list(filter, reference, pool));
                    }
                    out
                }
            }
        };

        result.retain(|&id| id != anchor);
        if filter.target_self && self.survives_filter(filter, anchor) {
            result.push(anchor);
        }
        result
    }

    /// Liveness gate for fighters named directly rather than found in a
    /// lane sweep. Side flags do not apply to them.
    fn survives_filter(&self, filter: &EffectFilter, id: FighterId) -> bool {
        match self.fighters.get(id) {
            Some(f) => !f.retreated && (filter.target_dead || f.is_alive()),
            None => false,
        }
    }

    /// Side and liveness predicate for the lane-sweep candidate pools.
    fn filter_accepts(&self, filter: &EffectFilter, owner_side: Side, id: FighterId) -> bool {
        let fighter = match self.fighters.get(id) {
            Some(f) => f,
            None => return false,
        };
        if fighter.retreated {
            return false;
        }
        if !filter.target_dead && !fighter.is_alive() {
            return false;
        }
        if fighter.side == owner_side {
            filter.target_allies
        } else {
            filter.target_enemies
        }
    }

    /// Narrow a candidate pool to the fighters the effect actually hits.
    fn select_from_list(
        &mut self,
        filter: &EffectFilter,
        reference: Location,
        mut pool: Vec<FighterId>,
    ) -> Vec<FighterId> {
        match filter.unit {
            EffectUnitType::All => pool,
            EffectUnitType::Random => {
                let mut out = Vec::new();
                while out.len() < filter.unit_count && !pool.is_empty() {
                    let pick = self.rng.gen_range(pool.len());
                    out.push(pool.swap_remove(pick));
                }
                out
            }
            EffectUnitType::NearestAhead => {
                // Sweep columns outwards from the owner: own-side slots in
                // front of it first, then the enemy columns front to back.
                let mut columns: Vec<(Side, usize)> = (0..reference.index)
                    .rev()
                    .map(|i| (reference.side, i))
                    .collect();
                columns.extend(
                    (0..self.settings.lane_capacity).map(|i| (reference.side.opposite(), i)),
                );
                let mut out = Vec::new();
                for (side, index) in columns {
                    if out.len() >= filter.unit_count {
                        break;
                    }
                    let room = filter.unit_count - out.len();
                    self.fighters_in_column(side, index, room, &pool, &mut out);
                }
                out
            }
            EffectUnitType::Front => {
                // Frontmost pool members on the owner's side only.
                let mut out = Vec::new();
                for index in 0..self.settings.lane_capacity {
                    if out.len() >= filter.unit_count {
                        break;
                    }
                    let room = filter.unit_count - out.len();
                    self.fighters_in_column(reference.side, index, room, &pool, &mut out);
                }
                out
            }
            // Handled before the pool is built.
            EffectUnitType::Source | EffectUnitType::Target => Vec::new(),
        }
    }

    /// Append up to `max` pool members standing at `index` on `side`,
    /// dropping random ones when the column holds more than fit.
    fn fighters_in_column(
        &mut self,
        side: Side,
        index: usize,
        max: usize,
        pool: &[FighterId],
        out: &mut Vec<FighterId>,
    ) {
        let mut column: Vec<FighterId> = self
            .lanes
            .iter()
            .filter_map(|lane| lane.side(side).get(index).copied())
            .filter(|id| pool.contains(id))
            .collect();
        while column.len() > max {
            let drop = self.rng.gen_range(column.len());
            column.swap_remove(drop);
        }
        out.extend(column);
    }
}
