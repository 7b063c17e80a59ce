use serde::{Deserialize, Serialize};

/// The event category that activates an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CauseType {
    Artifact,
    Summon,
    Step,
    Bonus,
    Block,
    Nonlethal,
    Death,
}

/// The mutating action an ability performs once triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectType {
    Damage,
    Buff,
    Summon,
    MoveFront,
    GainColor,
    GiveTrait,
    Retreat,
}

/// Which fighters may act as the source/target of a triggering cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CauseUnitType {
    Any,
    This,
    Enemy,
}

/// Which lanes a cause may originate from, relative to the ability owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CauseLane {
    This,
    Any,
}

/// Filter for the fighters that can activate an ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseFilter {
    pub unit: CauseUnitType,
    pub lane: CauseLane,
}

impl CauseFilter {
    pub fn new(unit: CauseUnitType, lane: CauseLane) -> Self {
        Self { unit, lane }
    }

    /// Matches any fighter in any lane, including "no fighter at all".
    pub fn any() -> Self {
        Self::new(CauseUnitType::Any, CauseLane::Any)
    }
}

/// The trigger condition of an ability: an event type plus filters for who
/// caused it and who it happened to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    pub kind: CauseType,
    pub source: CauseFilter,
    pub target: CauseFilter,
}

impl Cause {
    pub fn new(kind: CauseType, source: CauseFilter, target: CauseFilter) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }
}

/// Which fighters an effect should apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectUnitType {
    All,
    Random,
    Source,
    Target,
    NearestAhead,
    Front,
}

/// Which lanes an effect can reach.
///
/// `All` and `Any` select the same lanes; they differ only in whether the
/// fighter filter runs over the combined pool or per lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectLane {
    This,
    All,
    Any,
}

fn default_true() -> bool {
    true
}

fn default_count() -> usize {
    1
}

/// Filter for the fighters an effect applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectFilter {
    pub unit: EffectUnitType,
    pub lane: EffectLane,
    #[serde(default = "default_true")]
    pub target_self: bool,
    #[serde(default = "default_true")]
    pub target_allies: bool,
    #[serde(default = "default_true")]
    pub target_enemies: bool,
    #[serde(default)]
    pub target_dead: bool,
    #[serde(default = "default_count")]
    pub unit_count: usize,
}

impl EffectFilter {
    pub fn new(unit: EffectUnitType, lane: EffectLane) -> Self {
        Self {
            unit,
            lane,
            target_self: true,
            target_allies: true,
            target_enemies: true,
            target_dead: false,
            unit_count: 1,
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.unit_count = count;
        self
    }

    pub fn allies_only(mut self) -> Self {
        self.target_enemies = false;
        self
    }

    pub fn enemies_only(mut self) -> Self {
        self.target_self = false;
        self.target_allies = false;
        self
    }

    pub fn exclude_self(mut self) -> Self {
        self.target_self = false;
        self
    }

    pub fn include_dead(mut self) -> Self {
        self.target_dead = true;
        self
    }
}

/// The action half of an effect, with its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectKind {
    Damage { amount: i32 },
    Buff { health: i32, attack: i32 },
    Summon { units: Line },
    MoveFront,
    GainColor { amount: i32, for_opponent: bool },
    GiveTrait { name: String, amount: i32 },
    Retreat,
}

impl EffectKind {
    pub fn effect_type(&self) -> EffectType {
        match self {
            EffectKind::Damage { .. } => EffectType::Damage,
            EffectKind::Buff { .. } => EffectType::Buff,
            EffectKind::Summon { .. } => EffectType::Summon,
            EffectKind::MoveFront => EffectType::MoveFront,
            EffectKind::GainColor { .. } => EffectType::GainColor,
            EffectKind::GiveTrait { .. } => EffectType::GiveTrait,
            EffectKind::Retreat => EffectType::Retreat,
        }
    }
}

/// One effect of an ability: what to do and who to do it to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub kind: EffectKind,
    pub target: EffectFilter,
}

impl Effect {
    pub fn new(kind: EffectKind, target: EffectFilter) -> Self {
        Self { kind, target }
    }
}

/// A unit ability: a trigger condition and an ordered list of effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub description: String,
    pub cause: Cause,
    pub effects: Vec<Effect>,
}

impl Ability {
    pub fn new(description: &str, cause: Cause, effects: Vec<Effect>) -> Self {
        Self {
            description: description.to_string(),
            cause,
            effects,
        }
    }
}

/// A unit template. Immutable during battle; fighters copy its stats on
/// summon and may diverge from it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    pub health: i32,
    pub attack: i32,
    pub price: i32,
    #[serde(default)]
    pub fast: bool,
    #[serde(default)]
    pub agile: i32,
    #[serde(default)]
    pub block: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub anti_agile: bool,
    #[serde(default)]
    pub anti_block: bool,
    #[serde(default)]
    pub morph: bool,
    #[serde(default)]
    pub combo: bool,
    #[serde(default)]
    pub slow: bool,
    #[serde(default)]
    pub steady: bool,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl Unit {
    pub fn new(name: &str, health: i32, attack: i32, price: i32) -> Self {
        Self {
            name: name.to_string(),
            health,
            attack,
            price,
            fast: false,
            agile: 0,
            block: 0,
            armor: 0,
            anti_agile: false,
            anti_block: false,
            morph: false,
            combo: false,
            slow: false,
            steady: false,
            abilities: Vec::new(),
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }
}

/// A line of units deployed together as one purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub units: Vec<Unit>,
}

/// Price surcharge per unit beyond the first, as a trade-off for massing a
/// single lane.
const PRICE_PER_EXTRA_UNIT: f32 = 0.1;

impl Line {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    /// Total cost to deploy the line. Each unit beyond the first adds a
    /// surcharge percentage to the combined base price.
    pub fn total_price(&self) -> i32 {
        let multiplier = PRICE_PER_EXTRA_UNIT * self.units.len().saturating_sub(1) as f32;
        let total: i32 = self.units.iter().map(|u| u.price).sum();
        (total as f32 * (multiplier + 1.0)).floor() as i32
    }

    /// Probability weight for deploying this line: cheaper lines are more
    /// likely to be picked.
    pub fn total_weight(&self) -> f32 {
        1.0 / self.total_price() as f32
    }
}

/// A per-side artifact; carries exactly one ability that fires outside the
/// normal filter-matching path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,
    pub ability: Ability,
}

impl Artifact {
    pub fn new(name: &str, ability: Ability) -> Self {
        Self {
            name: name.to_string(),
            ability,
        }
    }
}

/// A squad/unit colour. The affinity weights decide critical-hit chances
/// between opposing colours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colour {
    pub name: String,
    #[serde(default)]
    pub red: f32,
    #[serde(default)]
    pub yellow: f32,
    #[serde(default)]
    pub blue: f32,
    #[serde(default)]
    pub white: f32,
    #[serde(default)]
    pub black: f32,
}

impl Colour {
    pub fn new(name: &str, red: f32, yellow: f32, blue: f32, white: f32, black: f32) -> Self {
        Self {
            name: name.to_string(),
            red,
            yellow,
            blue,
            white,
            black,
        }
    }

    /// A colour with no affinities; never advantaged against anything.
    pub fn neutral(name: &str) -> Self {
        Self::new(name, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// This colour's advantage over another, used as a critical-hit chance.
    /// Red beats yellow, yellow beats blue, blue beats red; gray (white/black)
    /// is advantageous against its opposite but not against itself.
    pub fn advantage(&self, other: &Colour) -> f32 {
        let mut total = self.red * (other.yellow - other.blue);
        total += self.yellow * (other.blue - other.red);
        total += self.blue * (other.red - other.yellow);
        total += (self.white * other.black - self.black * other.white).abs();
        total
    }
}
