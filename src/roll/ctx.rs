use super::{roller::Roller, tree::*, RResult};
use crate::common::*;
use crate::error::LimitExceeded;
use crate::parse::ast::{Dice, Expression};
use crate::stats::{self, StatBlock, StatSystem};

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Evaluates parsed expressions against a roller.
///
/// Holds no state between calls besides the roller itself.
pub struct RollContext<R = DefaultRoller> {
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(roller: R) -> Self {
        Self { roller }
    }

    pub fn roller(&mut self) -> &mut R {
        &mut self.roller
    }

    pub fn roll_dice(&mut self, dice: Dice) -> RolledGroup {
        let rolls = self.roller.roll_iter(dice.num.get(), dice.sides).collect();
        RolledGroup::new(dice, rolls)
    }

    pub fn eval(&mut self, expr: &Expression) -> Roll {
        let groups = expr.groups.mapped_ref(|&dice| self.roll_dice(dice));
        let roll = Roll::new(groups, expr.modifier);
        tracing::debug!(expr = %expr, total = roll.total, "rolled");
        roll
    }

    /// Rolls `expr` `times` times. The count is checked before anything is drawn.
    pub fn repeat(&mut self, expr: &Expression, times: usize, max: usize) -> RResult<MultiRoll> {
        if times < 1 {
            return Err(LimitExceeded::NoRepeats.into());
        }
        if times > max {
            return Err(LimitExceeded::TooManyRepeats { max }.into());
        }

        let first = self.eval(expr);
        let mut rolls = NonEmpty::new(first);
        for _ in 1..times {
            rolls.push(self.eval(expr));
        }
        Ok(MultiRoll { rolls })
    }

    pub fn roll_d20(&mut self, adv: AdvType, modifier: Int) -> D20Roll {
        let d20 = NonZeroUInt::new(CritType::D20).unwrap_or(NonZeroUInt::MIN);
        let first = self.roller.roll(d20);
        let mut rolls = NonEmpty::new(first);
        rolls.extend(self.roller.roll_iter(adv.dice() - 1, d20));
        D20Roll::new(adv, rolls, modifier)
    }

    pub fn stats(&mut self, system: StatSystem) -> StatBlock {
        stats::generate(system, &mut self.roller)
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}
