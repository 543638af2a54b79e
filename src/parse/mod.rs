//! Permissive dice-notation parsing.
//!
//! Dice terms (`NdS`, `dS`, `NdS+M`, `NdS-M`) are picked out of free text;
//! anything between them is ignored, so `"1d20xyz"` and `"attack: 1d20+5"`
//! both parse. Whitespace is stripped and the text lowercased first.

pub mod ast;
mod lexer;
mod parser;

use crate::common::{Int, UInt};
use crate::error::RollError;

/// Upper bounds applied to every dice term while parsing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Limits {
    pub max_dice: usize,
    pub max_sides: UInt,
}

impl Limits {
    pub const DEFAULT_MAX_DICE: usize = 100;
    pub const DEFAULT_MAX_SIDES: UInt = 1000;

    pub fn new(max_dice: usize, max_sides: UInt) -> Self {
        Self {
            max_dice,
            max_sides,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DICE, Self::DEFAULT_MAX_SIDES)
    }
}

/// Attempts to parse a string into a dice expression.
///
/// # Examples
/// ```
/// # use dicebot::parse::{parse, Limits};
/// let expr = parse("1d20 + 1d4 + 2", Limits::default()).unwrap();
/// assert_eq!(expr.groups.len(), 2);
/// assert_eq!(expr.modifier, 2);
/// ```
pub fn parse(s: &str, limits: Limits) -> Result<ast::Expression, RollError> {
    let normalized = normalize(s);
    let expr = parser::Parser::new(&normalized, limits).parse(s)?;
    tracing::debug!(
        source = s,
        groups = expr.groups.len(),
        modifier = expr.modifier,
        "parsed dice expression"
    );
    Ok(expr)
}

/// Parses a stand-alone modifier such as `+3`, `-1` or `2`. Blank means 0.
pub fn parse_modifier(s: &str) -> Result<Int, RollError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| RollError::InvalidModifier(s.to_owned()))
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
