mod ctx;
mod roller;
mod stringify;
mod tree;

use crate::error::RollError;

type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, RollContext};
pub use roller::Roller;
pub use stringify::{Formatted, MarkdownStringifier, SimpleStringifier, Stringify};
pub use tree::{D20Roll, MultiRoll, Roll, RolledGroup};

#[cfg(test)]
pub(crate) use roller::StepRoller;

use crate::parse::ast::Expression;

pub fn eval<R: Roller>(expr: &Expression, roller: R) -> Roll {
    RollContext::new(roller).eval(expr)
}

/// Renders `roll` in the plain `"NdS: [a, b] + ... ±M"` form.
pub fn format(roll: &Roll) -> Formatted {
    SimpleStringifier.format(roll)
}
