use crate::common::*;
use crate::parse::ast::Dice;

/// The dice drawn for one term of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolledGroup {
    pub dice: Dice,
    /// In draw order.
    pub rolls: Vec<UInt>,
    pub sum: Int,
}

impl RolledGroup {
    pub(crate) fn new(dice: Dice, rolls: Vec<UInt>) -> Self {
        let sum = rolls.iter().map(|&x| Int::from(x)).sum();
        Self { dice, rolls, sum }
    }

    pub fn crit(&self) -> CritType {
        match self.rolls.as_slice() {
            [value] if self.dice.is_single_d20() => CritType::of_d20(*value),
            _ => CritType::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roll {
    pub groups: NonEmpty<RolledGroup>,
    pub modifier: Int,
    pub total: Int,
}

impl Roll {
    pub(crate) fn new(groups: NonEmpty<RolledGroup>, modifier: Int) -> Self {
        let total = groups
            .iter()
            .fold(0, |acc: Int, g| acc.saturating_add(g.sum))
            .saturating_add(modifier);
        Self {
            groups,
            modifier,
            total,
        }
    }

    pub fn total(&self) -> Int {
        self.total
    }

    /// Natural 20s and 1s on lone d20 terms, in term order.
    pub fn crits(&self) -> impl Iterator<Item = CritType> + '_ {
        self.groups
            .iter()
            .map(RolledGroup::crit)
            .filter(|crit| !crit.is_none())
    }
}

/// A single d20 check, optionally rolled twice for (dis)advantage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct D20Roll {
    pub adv: AdvType,
    pub rolls: NonEmpty<UInt>,
    pub modifier: Int,
}

impl D20Roll {
    pub(crate) fn new(adv: AdvType, rolls: NonEmpty<UInt>, modifier: Int) -> Self {
        Self {
            adv,
            rolls,
            modifier,
        }
    }

    /// Index of the die that counts; the first one on ties.
    pub fn kept_index(&self) -> usize {
        let kept = self.kept();
        self.rolls.iter().position(|&x| x == kept).unwrap_or(0)
    }

    pub fn kept(&self) -> UInt {
        let rolls = self.rolls.iter().copied();
        let kept = match self.adv {
            AdvType::Dis => rolls.min(),
            AdvType::None | AdvType::Adv => rolls.max(),
        };
        kept.unwrap_or(*self.rolls.first())
    }

    pub fn total(&self) -> Int {
        Int::from(self.kept()).saturating_add(self.modifier)
    }

    pub fn crit(&self) -> CritType {
        CritType::of_d20(self.kept())
    }
}

/// The same expression rolled several times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiRoll {
    pub rolls: NonEmpty<Roll>,
}

impl MultiRoll {
    pub fn totals(&self) -> Vec<Int> {
        self.rolls.iter().map(Roll::total).collect()
    }

    pub fn sum(&self) -> Int {
        self.rolls
            .iter()
            .fold(0, |acc: Int, roll| acc.saturating_add(roll.total))
    }

    pub fn average(&self) -> f64 {
        self.sum() as f64 / self.rolls.len() as f64
    }

    pub fn min(&self) -> Int {
        self.rolls.iter().map(Roll::total).min().unwrap_or(0)
    }

    pub fn max(&self) -> Int {
        self.rolls.iter().map(Roll::total).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(num: usize, sides: UInt, rolls: Vec<UInt>) -> RolledGroup {
        let dice = Dice::new(Num::new(num).unwrap(), NonZeroUInt::new(sides).unwrap(), 0);
        RolledGroup::new(dice, rolls)
    }

    #[test]
    fn test_group_crit() {
        assert_eq!(group(1, 20, vec![20]).crit(), CritType::Crit);
        assert_eq!(group(1, 20, vec![1]).crit(), CritType::Fail);
        assert_eq!(group(1, 20, vec![7]).crit(), CritType::None);
        assert_eq!(group(2, 20, vec![20, 20]).crit(), CritType::None);
        assert_eq!(group(1, 12, vec![1]).crit(), CritType::None);
    }

    #[test]
    fn test_roll_total() {
        let groups = vec1![group(1, 20, vec![20]), group(2, 6, vec![3, 4])];
        let roll = Roll::new(groups, -2);
        assert_eq!(roll.total(), 20 + 7 - 2);
        assert_eq!(roll.crits().collect::<Vec<_>>(), vec![CritType::Crit]);
    }

    #[test]
    fn test_d20_advantage() {
        let adv = D20Roll::new(AdvType::Adv, vec1![7, 15], 2);
        assert_eq!(adv.kept(), 15);
        assert_eq!(adv.kept_index(), 1);
        assert_eq!(adv.total(), 17);

        let dis = D20Roll::new(AdvType::Dis, vec1![1, 15], 5);
        assert_eq!(dis.kept(), 1);
        assert_eq!(dis.total(), 6);
        assert_eq!(dis.crit(), CritType::Fail);
    }

    #[test]
    fn test_multi_summary() {
        let roll = |x: UInt| Roll::new(vec1![group(1, 20, vec![x])], 0);
        let multi = MultiRoll {
            rolls: vec1![roll(4), roll(10), roll(19)],
        };
        assert_eq!(multi.totals(), vec![4, 10, 19]);
        assert_eq!(multi.sum(), 33);
        assert_eq!(multi.average(), 11.0);
        assert_eq!(multi.min(), 4);
        assert_eq!(multi.max(), 19);
    }

    #[test]
    fn test_multi_sum_saturates() {
        let roll = |x: UInt| Roll::new(vec1![group(1, 20, vec![x])], Int::MAX);
        let multi = MultiRoll {
            rolls: vec1![roll(4), roll(10)],
        };
        assert_eq!(multi.totals(), vec![Int::MAX, Int::MAX]);
        assert_eq!(multi.sum(), Int::MAX);
        assert_eq!(multi.max(), Int::MAX);
    }
}
