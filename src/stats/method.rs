use super::pool::DrawPool;
use crate::common::*;
use crate::roll::Roller;
use std::fmt;

/// How a single stat value came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatDetail {
    /// Dice rolled with the lowest ones discarded, kept dice highest first.
    Kept { kept: Vec<UInt>, dropped: Vec<UInt> },
    Sum { rolls: Vec<UInt>, bonus: Int },
    /// A value taken from a fixed array.
    Drawn(UInt),
    /// A die size taken from a pool, then rolled once.
    Stepped { sides: NonZeroUInt, roll: UInt },
}

impl StatDetail {
    pub fn total(&self) -> Int {
        match self {
            Self::Kept { kept, .. } => kept.iter().map(|&x| Int::from(x)).sum(),
            Self::Sum { rolls, bonus } => rolls.iter().map(|&x| Int::from(x)).sum::<Int>() + bonus,
            Self::Drawn(x) => Int::from(*x),
            Self::Stepped { roll, .. } => Int::from(*roll),
        }
    }
}

impl fmt::Display for StatDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kept { kept, dropped } => {
                write!(f, "{:?}", kept)?;
                if !dropped.is_empty() {
                    write!(f, " drop {:?}", dropped)?;
                }
                Ok(())
            }
            Self::Sum { rolls, bonus } => {
                write!(f, "{:?}", rolls)?;
                if *bonus != 0 {
                    write!(f, " {:+}", bonus)?;
                }
                Ok(())
            }
            Self::Drawn(x) => write!(f, "{}", x),
            Self::Stepped { sides, roll } => write!(f, "d{}: [{}]", sides, roll),
        }
    }
}

#[enum_dispatch::enum_dispatch]
pub(crate) trait StatMethod {
    fn roll_stat<R: Roller>(&mut self, roller: &mut R) -> StatDetail;
}

#[enum_dispatch::enum_dispatch(StatMethod)]
#[derive(Debug, Clone)]
pub(crate) enum Method {
    DropLowest,
    SumDice,
    StandardArray,
    SteppedDie,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct DropLowest {
    pub num: usize,
    pub sides: NonZeroUInt,
    pub drop: usize,
}

impl StatMethod for DropLowest {
    fn roll_stat<R: Roller>(&mut self, roller: &mut R) -> StatDetail {
        let mut kept: Vec<_> = roller.roll_iter(self.num, self.sides).collect();
        kept.sort_unstable_by(|a, b| b.cmp(a));
        let dropped = kept.split_off(self.num.saturating_sub(self.drop));
        StatDetail::Kept { kept, dropped }
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct SumDice {
    pub num: usize,
    pub sides: NonZeroUInt,
    pub bonus: Int,
}

impl StatMethod for SumDice {
    fn roll_stat<R: Roller>(&mut self, roller: &mut R) -> StatDetail {
        StatDetail::Sum {
            rolls: roller.roll_iter(self.num, self.sides).collect(),
            bonus: self.bonus,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StandardArray {
    pub pool: DrawPool<UInt>,
}

impl StatMethod for StandardArray {
    fn roll_stat<R: Roller>(&mut self, roller: &mut R) -> StatDetail {
        StatDetail::Drawn(self.pool.draw(roller))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SteppedDie {
    pub pool: DrawPool<NonZeroUInt>,
}

impl StatMethod for SteppedDie {
    fn roll_stat<R: Roller>(&mut self, roller: &mut R) -> StatDetail {
        let sides = self.pool.draw(roller);
        StatDetail::Stepped {
            sides,
            roll: roller.roll(sides),
        }
    }
}
