use super::tree::*;
use crate::common::*;
use crate::stats::{StatBlock, StatDetail, StatValue};

/// The rendered breakdown of a roll together with its total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub details: String,
    pub total: Int,
}

const MAX_TOTALS_LEN: usize = 100;

pub trait Stringify {
    fn format(&mut self, roll: &Roll) -> Formatted {
        Formatted {
            details: self.str_roll(roll),
            total: roll.total,
        }
    }

    /// Groups joined by `" + "`, then the net modifier as its own token.
    fn str_roll(&mut self, roll: &Roll) -> String {
        let mut ret = roll
            .groups
            .iter()
            .map(|g| self.str_group(g))
            .collect::<Vec<_>>()
            .join(" + ");
        if roll.modifier != 0 {
            ret.push(' ');
            ret.push_str(&self.str_modifier(roll.modifier));
        }
        ret
    }

    fn str_group(&mut self, group: &RolledGroup) -> String {
        let values = group
            .rolls
            .iter()
            .map(|&x| self.str_die(x, group.dice.sides))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: [{}]", group.dice, values)
    }

    fn str_die(&mut self, value: UInt, _sides: NonZeroUInt) -> String {
        value.to_string()
    }

    fn str_kept(&mut self, value: UInt) -> String {
        value.to_string()
    }

    fn str_dropped(&mut self, values: &[UInt]) -> String {
        format!("drop {:?}", values)
    }

    fn str_modifier(&mut self, modifier: Int) -> String {
        format!("{:+}", modifier)
    }

    fn str_total(&mut self, total: Int) -> String {
        total.to_string()
    }

    fn str_d20(&mut self, roll: &D20Roll) -> String {
        let kept = roll.kept_index();
        let dice = roll
            .rolls
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                if i == kept && roll.rolls.len() > 1 {
                    self.str_kept(x)
                } else {
                    x.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let total = self.str_total(roll.total());
        format!("{} {} = {}", dice, self.str_modifier(roll.modifier), total)
    }

    /// Comma-separated totals, cut to fit a chat field.
    fn str_totals(&mut self, multi: &MultiRoll) -> String {
        let ret = multi
            .totals()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if ret.len() > MAX_TOTALS_LEN {
            format!("{}...", &ret[..MAX_TOTALS_LEN - 3])
        } else {
            ret
        }
    }

    fn str_stat(&mut self, value: &StatValue) -> String {
        let detail = match &value.detail {
            StatDetail::Kept { kept, dropped } if !dropped.is_empty() => {
                format!("{:?} {}", kept, self.str_dropped(dropped))
            }
            detail => detail.to_string(),
        };
        format!("{}: {} = {}", value.label, detail, self.str_total(value.total))
    }

    fn str_stat_block(&mut self, block: &StatBlock) -> String {
        let mut lines: Vec<_> = block.values.iter().map(|v| self.str_stat(v)).collect();
        lines.push(format!(
            "Total: {} (Average: {:.1}) {}",
            self.str_total(block.total()),
            block.average(),
            block.rating()
        ));
        lines.join("\n")
    }
}

#[derive(Default)]
pub struct SimpleStringifier;

impl SimpleStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for SimpleStringifier {}

/// Chat-flavoured output: natural maxima and ones in bold, dropped dice
/// struck through, totals in backticks.
#[derive(Default)]
pub struct MarkdownStringifier;

impl MarkdownStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for MarkdownStringifier {
    fn str_die(&mut self, value: UInt, sides: NonZeroUInt) -> String {
        if value == 1 || value == sides.get() {
            self.str_kept(value)
        } else {
            value.to_string()
        }
    }

    fn str_kept(&mut self, value: UInt) -> String {
        format!("**{}**", value)
    }

    fn str_dropped(&mut self, values: &[UInt]) -> String {
        format!("~~{:?}~~", values)
    }

    fn str_total(&mut self, total: Int) -> String {
        format!("`{}`", total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, Limits};
    use crate::roll::{RollContext, StepRoller};
    use crate::stats::StatSystem;

    fn roll(s: &str, initial: UInt) -> Roll {
        let roller = StepRoller::new(NonZeroUInt::new(initial).unwrap(), 1);
        let expr = parse(s, Limits::default()).unwrap();
        RollContext::new(roller).eval(&expr)
    }

    macro_rules! check {
        ($cls:ident, $input:expr, $expected:expr) => {
            let actual = $cls::new().str_roll(&roll($input, 10));
            assert_eq!(&actual, $expected);
        };
    }

    #[test]
    fn test_simple_stringify() {
        check!(SimpleStringifier, "1d20", "1d20: [10]");
        check!(SimpleStringifier, "2d6+3", "2d6: [4, 5] +3");
        check!(SimpleStringifier, "1d20+1d4+2", "1d20: [10] + 1d4: [3] +2");
        check!(SimpleStringifier, "d8-1", "1d8: [2] -1");
        check!(SimpleStringifier, "1d6+1d6-1", "1d6: [4] + 1d6: [5] -1");
    }

    #[test]
    fn test_format() {
        let formatted = crate::roll::format(&roll("1d20+1d4+2", 10));
        assert_eq!(
            formatted,
            Formatted {
                details: "1d20: [10] + 1d4: [3] +2".into(),
                total: 15,
            }
        );
    }

    #[test]
    fn test_markdown_stringify() {
        check!(MarkdownStringifier, "1d20", "1d20: [10]");
        check!(MarkdownStringifier, "3d4", "3d4: [2, 3, **4**]");
        check!(MarkdownStringifier, "4d12+2", "4d12: [10, 11, **12**, **1**] +2");
    }

    #[test]
    fn test_d20() {
        let mut ctx = RollContext::new(StepRoller::new(NonZeroUInt::new(7).unwrap(), 8));
        let adv = ctx.roll_d20(AdvType::Adv, 2);
        assert_eq!(SimpleStringifier.str_d20(&adv), "7, 15 +2 = 17");
        assert_eq!(MarkdownStringifier.str_d20(&adv), "7, **15** +2 = `17`");
    }

    #[test]
    fn test_totals_truncated() {
        let expr = parse("100d1000", Limits::default()).unwrap();
        let mut ctx = RollContext::new(StepRoller::new(NonZeroUInt::new(900).unwrap(), 1));
        let multi = ctx.repeat(&expr, 20, 20).unwrap();
        let s = SimpleStringifier.str_totals(&multi);
        assert_eq!(s.len(), 100);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn test_stat_block() {
        // 4d6 per stat: 3,4,5,6 then 1,2,3,4 and so on
        let mut ctx = RollContext::new(StepRoller::new(NonZeroUInt::new(3).unwrap(), 1));
        let block = ctx.stats(StatSystem::Dnd);
        let s = MarkdownStringifier.str_stat(&block.values[0]);
        assert_eq!(s, "STR: [6, 5, 4] ~~[3]~~ = `15`");
        let s = SimpleStringifier.str_stat(&block.values[1]);
        assert_eq!(s, "DEX: [4, 3, 2] drop [1] = 9");
        assert!(SimpleStringifier.str_stat_block(&block).ends_with(&format!(
            "Total: {} (Average: {:.1}) {}",
            block.total(),
            block.average(),
            block.rating()
        )));
    }
}
