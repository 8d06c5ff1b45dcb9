use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

/// The score of an alignment.
///
/// Higher scores are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Score(i64);

impl Score {
    pub const MIN: Self = Self(i64::MIN);
    pub const ZERO: Self = Self(0);

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i8> for Score {
    fn from(value: i8) -> Self {
        Self(value.into())
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Weighs a score by a count of symbol pairs.
impl Mul<usize> for Score {
    type Output = Score;

    fn mul(self, rhs: usize) -> Self::Output {
        let rhs = i64::try_from(rhs).unwrap_or(i64::MAX);
        Self(self.0 * rhs)
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl FromStr for Score {
    type Err = <i64 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        i64::from_str(s).map(Self)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Width and alignment flags apply to the inner value.
        Display::fmt(&self.0, f)
    }
}
