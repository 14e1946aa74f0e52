use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::AmbiguousNumber;

/// Character between a number and its sub-index in generated names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FractionSeparator {
    #[default]
    #[serde(rename = "x")]
    #[cfg_attr(feature = "clap", value(name = "x"))]
    X,
    #[serde(rename = "#")]
    #[cfg_attr(feature = "clap", value(name = "#"))]
    Hash,
}

impl FractionSeparator {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::X => 'x',
            Self::Hash => '#',
        }
    }
}

/// How chapter sub-indexes are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ChapterNumbering {
    /// `1.5` is written `001x5`
    #[default]
    Literal,
    /// Bonus chapters start at `.5`: `1.5` is written `001x1` and `1.6` is `001x2`.
    /// Smaller sub-indexes are split chapters, written with their position and
    /// the actual number, `002x1 (c002.1)`.
    Bonus,
}

impl ChapterNumbering {
    pub const BONUS_OFFSET: u32 = 4;
}

/// A volume, chapter or page number.
///
/// The fraction is a sub-index rather than a decimal: `1.5` is the fifth part
/// attached to `1`, and `1.10` comes after `1.9`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number {
    pub base: u32,
    pub fraction: Option<u32>,
}

impl Number {
    #[must_use]
    pub const fn new(base: u32) -> Self {
        Self {
            base,
            fraction: None,
        }
    }

    #[must_use]
    pub const fn with_fraction(base: u32, fraction: u32) -> Self {
        Self {
            base,
            fraction: Some(fraction),
        }
    }

    /// Zero pads the base to `width` and appends the fraction after `separator`
    #[must_use]
    pub fn pad(&self, width: usize, separator: char) -> String {
        match self.fraction {
            Some(fraction) => format!("{:0width$}{separator}{fraction}", self.base),
            None => format!("{:0width$}", self.base),
        }
    }
}

impl From<u32> for Number {
    fn from(base: u32) -> Self {
        Self::new(base)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fraction {
            Some(fraction) => write!(f, "{}.{fraction}", self.base),
            None => write!(f, "{}", self.base),
        }
    }
}

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

impl FromStr for Number {
    type Err = AmbiguousNumber;

    /// Accepts `12`, `012` and `12.5`. Rejects `12.`, `.5`, `1.2.3`, `1.05` and anything non numeric.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let ambiguous = || AmbiguousNumber {
            value: value.to_string(),
        };

        let (base, fraction) = match value.split_once('.') {
            Some((base, fraction)) => (base, Some(fraction)),
            None => (value, None),
        };

        let base = parse_digits(base).ok_or_else(ambiguous)?;
        let fraction = match fraction {
            Some(fraction) if fraction.len() > 1 && fraction.starts_with('0') => {
                return Err(ambiguous());
            }
            Some(fraction) => Some(parse_digits(fraction).ok_or_else(ambiguous)?),
            None => None,
        };

        Ok(Self { base, fraction })
    }
}
