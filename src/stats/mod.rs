//! Ability-score generation under the supported rule systems.
//!
//! Each call to [`generate`] builds its own rolling method, including any
//! draw pool, so nothing is shared between stat blocks.

mod method;
mod pool;

pub use method::StatDetail;
pub use pool::DrawPool;

use crate::common::*;
use crate::error::RollError;
use crate::roll::Roller;
use method::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ABILITIES: &[&str] = &["STR", "DEX", "CON", "INT", "WIS", "CHA"];
pub const SPECIAL: &[&str] = &["STR", "PER", "END", "CHA", "INT", "AGI", "LCK"];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatSystem {
    #[default]
    Dnd,
    Adnd,
    Pathfinder,
    Heroic,
    Standard,
    Special,
    Cortex,
}

impl StatSystem {
    pub const ALL: [Self; 7] = [
        Self::Dnd,
        Self::Adnd,
        Self::Pathfinder,
        Self::Heroic,
        Self::Standard,
        Self::Special,
        Self::Cortex,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Dnd => "dnd",
            Self::Adnd => "adnd",
            Self::Pathfinder => "pathfinder",
            Self::Heroic => "heroic",
            Self::Standard => "standard",
            Self::Special => "special",
            Self::Cortex => "cortex",
        }
    }

    pub(crate) fn ids() -> String {
        Self::ALL.map(Self::id).join(", ")
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Dnd | Self::Pathfinder => "4d6, drop lowest",
            Self::Adnd => "3d6",
            Self::Heroic => "2d6+6",
            Self::Standard => "standard array",
            Self::Special => "5+1d5",
            Self::Cortex => "cortex dice steps",
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Special => SPECIAL,
            _ => ABILITIES,
        }
    }

    pub fn thresholds(self) -> Thresholds {
        match self {
            Self::Dnd | Self::Pathfinder | Self::Standard => Thresholds::new(78, 72, 66, 60),
            Self::Adnd => Thresholds::new(72, 66, 60, 54),
            Self::Heroic => Thresholds::new(90, 84, 78, 72),
            Self::Special => Thresholds::new(63, 59, 56, 52),
            Self::Cortex => Thresholds::new(34, 30, 26, 22),
        }
    }

    fn method<R: Roller>(self, roller: &mut R) -> Method {
        let d = |sides: UInt| NonZeroUInt::new(sides).unwrap_or(NonZeroUInt::MIN);
        match self {
            Self::Dnd | Self::Pathfinder => DropLowest {
                num: 4,
                sides: d(6),
                drop: 1,
            }
            .into(),
            Self::Adnd => SumDice {
                num: 3,
                sides: d(6),
                bonus: 0,
            }
            .into(),
            Self::Heroic => SumDice {
                num: 2,
                sides: d(6),
                bonus: 6,
            }
            .into(),
            Self::Special => SumDice {
                num: 1,
                sides: d(5),
                bonus: 5,
            }
            .into(),
            Self::Standard => StandardArray {
                pool: DrawPool::shuffled(vec1![15, 14, 13, 12, 10, 8], roller),
            }
            .into(),
            Self::Cortex => SteppedDie {
                pool: DrawPool::shuffled(vec1![4, 6, 8, 10, 12, 6].mapped(d), roller),
            }
            .into(),
        }
    }
}

impl fmt::Display for StatSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StatSystem {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|system| system.id() == id)
            .ok_or_else(|| RollError::UnknownSystem(s.to_owned()))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rating {
    Exceptional,
    Great,
    Good,
    Average,
    Challenging,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exceptional => "Exceptional",
            Self::Great => "Great",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Challenging => "Challenging",
        };
        f.write_str(s)
    }
}

/// Inclusive lower bounds on a stat block's total for each rating.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Thresholds {
    pub exceptional: Int,
    pub great: Int,
    pub good: Int,
    pub average: Int,
}

impl Thresholds {
    pub const fn new(exceptional: Int, great: Int, good: Int, average: Int) -> Self {
        Self {
            exceptional,
            great,
            good,
            average,
        }
    }

    pub fn rate(&self, total: Int) -> Rating {
        if total >= self.exceptional {
            Rating::Exceptional
        } else if total >= self.great {
            Rating::Great
        } else if total >= self.good {
            Rating::Good
        } else if total >= self.average {
            Rating::Average
        } else {
            Rating::Challenging
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatValue {
    pub label: &'static str,
    pub detail: StatDetail,
    pub total: Int,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatBlock {
    pub system: StatSystem,
    pub values: Vec<StatValue>,
}

impl StatBlock {
    pub fn total(&self) -> Int {
        self.values.iter().map(|v| v.total).sum()
    }

    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.total() as f64 / self.values.len() as f64
        }
    }

    pub fn rating(&self) -> Rating {
        self.system.thresholds().rate(self.total())
    }

    pub fn get(&self, label: &str) -> Option<Int> {
        self.values
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.total)
    }

    /// Label/value pairs in generation order.
    pub fn scores(&self) -> impl Iterator<Item = (&'static str, Int)> + '_ {
        self.values.iter().map(|v| (v.label, v.total))
    }
}

pub fn generate<R: Roller>(system: StatSystem, roller: &mut R) -> StatBlock {
    let mut method = system.method(roller);
    let values = system
        .labels()
        .iter()
        .map(|&label| {
            let detail = method.roll_stat(roller);
            StatValue {
                label,
                total: detail.total(),
                detail,
            }
        })
        .collect();

    let block = StatBlock { system, values };
    tracing::debug!(%system, total = block.total(), "generated stat block");
    block
}

pub fn generate_stats<R: Roller>(id: &str, roller: &mut R) -> Result<StatBlock, RollError> {
    Ok(generate(id.parse()?, roller))
}
