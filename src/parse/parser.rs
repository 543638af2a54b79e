use super::{ast::*, lexer::*, Limits};
use crate::common::*;
use crate::error::{LimitExceeded, RollError};
use logos_iter::LogosIter;

type PResult<T> = Result<T, RollError>;

/// Scans tokens left to right and collects every `[N]d S [±M]` run.
///
/// A signed integer after a term is its modifier, unless a `d` follows it,
/// in which case it is the count of the next term (`1d20+1d4` is two terms,
/// not `1d20+1` then `d4`).
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    limits: Limits,
    groups: Vec<Dice>,
    modifier: Int,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str, limits: Limits) -> Self {
        Self {
            lexer: lexer(s),
            limits,
            groups: Vec::new(),
            modifier: 0,
        }
    }

    pub fn parse(mut self, source: &str) -> PResult<Expression> {
        while let Some(token) = self.advance() {
            match token {
                TokenKind::Integer(num) if self.matches(TokenKind::Dice) => {
                    self.advance();
                    self.parse_dice(Some(num))?;
                }
                TokenKind::Dice => self.parse_dice(None)?,
                _ => tracing::trace!(%token, "skipping"),
            }
        }

        let groups = NonEmpty::try_from_vec(self.groups)
            .map_err(|_| RollError::MalformedExpression(source.to_owned()))?;
        Ok(Expression::new(groups, self.modifier, source))
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn peek_integer(&mut self) -> Option<u64> {
        match self.lexer.peek() {
            Some(&TokenKind::Integer(x)) => Some(x),
            _ => None,
        }
    }

    /// Called with the `d` already consumed.
    fn parse_dice(&mut self, mut num: Option<u64>) -> PResult<()> {
        loop {
            let sides = match self.peek_integer() {
                Some(sides) => {
                    self.advance();
                    sides
                }
                None => return Ok(()),
            };

            let (modifier, next) = self.parse_modifier();
            let dice = self.validate(num.unwrap_or(1), sides, modifier)?;
            self.groups.push(dice);
            self.modifier = self.modifier.saturating_add(modifier);

            match next {
                Some(_) => num = next,
                None => return Ok(()),
            }
        }
    }

    /// Returns the modifier, or the count of a directly following term.
    fn parse_modifier(&mut self) -> (Int, Option<u64>) {
        let negative = if self.matches(TokenKind::Plus) {
            false
        } else if self.matches(TokenKind::Minus) {
            true
        } else {
            return (0, None);
        };
        self.advance();

        // A dangling sign counts as +0.
        let value = match self.peek_integer() {
            Some(value) => value,
            None => return (0, None),
        };
        self.advance();

        // `+2d6` starts the next term; `+2d` with no sides is still a modifier.
        if self.matches(TokenKind::Dice) {
            self.advance();
            if self.peek_integer().is_some() {
                return (0, Some(value));
            }
        }

        let value = Int::try_from(value).unwrap_or(Int::MAX);
        (if negative { -value } else { value }, None)
    }

    fn validate(&self, num: u64, sides: u64, modifier: Int) -> Result<Dice, LimitExceeded> {
        let Limits {
            max_dice,
            max_sides,
        } = self.limits;

        if num > max_dice as u64 {
            return Err(LimitExceeded::TooManyDice { max: max_dice });
        }
        if sides > u64::from(max_sides) {
            return Err(LimitExceeded::TooManySides { max: max_sides });
        }
        let sides = UInt::try_from(sides)
            .ok()
            .and_then(NonZeroUInt::new)
            .ok_or(LimitExceeded::NoSides)?;
        let num = usize::try_from(num)
            .ok()
            .and_then(Num::new)
            .ok_or(LimitExceeded::NoDice)?;

        Ok(Dice::new(num, sides, modifier))
    }
}
