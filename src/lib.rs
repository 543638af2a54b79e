pub mod character;
pub mod common;
pub mod config;
pub mod error;
pub mod parse;
pub mod roll;
pub mod stats;

pub use common::{AdvType, CritType};
pub use config::Config;
pub use error::{LimitExceeded, RollError};
pub use parse::{ast::Expression, parse, parse_modifier, Limits};
pub use roll::{eval, format, Formatted, Roll, RollContext, Roller};
pub use stats::{generate_stats, StatBlock, StatSystem};

/// Parses and rolls `s` with the thread-local RNG.
pub fn roll(s: &str, limits: Limits) -> Result<Roll, RollError> {
    let expr = parse(s, limits)?;
    Ok(RollContext::default().eval(&expr))
}
