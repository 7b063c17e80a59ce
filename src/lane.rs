use crate::fighter::FighterId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of the battlefield a fighter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn is_left(self) -> bool {
        self == Side::Left
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "Left"),
            Side::Right => write!(f, "Right"),
        }
    }
}

/// A fighter's position, derived on demand by scanning the lanes.
/// Index 0 is the frontmost slot, closest to the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub side: Side,
    pub lane: usize,
    pub index: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}-{}", self.side, self.lane, self.index)
    }
}

/// A single combat column: an ordered front-to-back fighter sequence per
/// side. Removal always compacts, so indices stay contiguous.
#[derive(Debug, Clone, Default)]
pub struct Lane {
    pub left: Vec<FighterId>,
    pub right: Vec<FighterId>,
    /// Set when a fighter retreats out of this lane; cleared on cleanup.
    pub fighter_retreated: bool,
}

impl Lane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &Vec<FighterId> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Vec<FighterId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Whether there are fighters on both sides.
    pub fn fighting(&self) -> bool {
        !self.left.is_empty() && !self.right.is_empty()
    }
}
