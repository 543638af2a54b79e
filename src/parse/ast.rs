use crate::common::*;
use std::fmt;

/// One `NdS±M` term.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dice {
    pub num: Num,
    pub sides: NonZeroUInt,
    /// The signed integer written right after this term, `0` if none.
    pub modifier: Int,
}

impl Dice {
    pub fn new(num: Num, sides: NonZeroUInt, modifier: Int) -> Self {
        Self {
            num,
            sides,
            modifier,
        }
    }

    /// A lone d20, the only roll that can crit.
    pub fn is_single_d20(&self) -> bool {
        self.num.get() == 1 && self.sides.get() == CritType::D20
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num, self.sides)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Terms in the order they appear in the source text.
    pub groups: NonEmpty<Dice>,
    /// Sum of every term's modifier; applied once to the total.
    pub modifier: Int,
    pub source: String,
}

impl Expression {
    pub(crate) fn new(groups: NonEmpty<Dice>, modifier: Int, source: impl Into<String>) -> Self {
        Self {
            groups,
            modifier,
            source: source.into(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dice) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            fmt::Display::fmt(dice, f)?;
        }
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}
