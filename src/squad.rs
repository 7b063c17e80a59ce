use crate::rng::BattleRng;
use crate::types::{Artifact, Colour, Line};
use serde::{Deserialize, Serialize};

/// A side's roster: the lines it can buy, its colour, its money, and an
/// optional artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Squad {
    pub name: String,
    pub colour: Colour,
    pub lines: Vec<Line>,
    #[serde(default)]
    pub artifact: Option<Artifact>,
    #[serde(default)]
    pub is_boss: bool,
    pub start_money: i32,
    #[serde(default)]
    pub money: i32,
}

impl Squad {
    pub fn new(name: &str, colour: Colour, lines: Vec<Line>, start_money: i32) -> Self {
        Self {
            name: name.to_string(),
            colour,
            lines,
            artifact: None,
            is_boss: false,
            start_money,
            money: 0,
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn boss(mut self) -> Self {
        self.is_boss = true;
        self
    }

    /// Whether the squad has a line that fits in `max_count` slots and that
    /// it can afford.
    pub fn can_summon(&self, max_count: usize) -> bool {
        self.lines.iter().any(|l| {
            !l.units.is_empty() && l.total_price() <= self.money && l.units.len() <= max_count
        })
    }

    /// Pick a random affordable, space-fitting line, weighted by the inverse
    /// of each line's total price.
    pub fn random_line(&self, max_count: usize, rng: &mut dyn BattleRng) -> Option<Line> {
        let available: Vec<&Line> = self
            .lines
            .iter()
            .filter(|l| {
                !l.units.is_empty() && l.total_price() <= self.money && l.units.len() <= max_count
            })
            .collect();
        let mut pool: f32 = available.iter().map(|l| l.total_weight()).sum();

        for line in &available {
            if rng.value() <= line.total_weight() / pool {
                return Some((*line).clone());
            }
            pool -= line.total_weight();
        }
        None
    }
}
