use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Num = NonZeroUsize;

pub use vec1::vec1;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Advisory flag for natural 20s and natural 1s on a single d20.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CritType {
    None = 0,
    Crit = 1,
    Fail = 2,
}

impl CritType {
    pub const D20: UInt = 20;

    pub fn of_d20(value: UInt) -> Self {
        match value {
            Self::D20 => Self::Crit,
            1 => Self::Fail,
            _ => Self::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl fmt::Display for CritType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "",
            Self::Crit => "Natural 20!",
            Self::Fail => "Natural 1!",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum AdvType {
    #[default]
    None = 0,
    Adv = 1,
    Dis = -1,
}

impl AdvType {
    pub(crate) fn dice(self) -> usize {
        match self {
            Self::None => 1,
            Self::Adv | Self::Dis => 2,
        }
    }
}

impl fmt::Display for AdvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "Roll",
            Self::Adv => "Advantage",
            Self::Dis => "Disadvantage",
        };
        f.write_str(s)
    }
}

/// Text that switches a nickname or backstory back to nothing.
pub(crate) fn is_clear_keyword(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "clear" | "remove" | "none")
}
