//! Ideal scaling reference curves.
//!
//! A curve starts from a seed value and is extended one count at a time by
//! multiplying with the ratio the expected scaling gives for the step from
//! the previous count to the next.

use crate::utils::error::ProfileError;
use std::fmt;
use std::str::FromStr;

/// Expected scaling of a quantity with the process or thread count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Scaling {
    #[value(name = "constant")]
    Constant,
    /// Decreases linearly (strong scaling of run time)
    #[value(name = "lineard")]
    LinearDecreasing,
    #[value(name = "lineari")]
    LinearIncreasing,
    #[value(name = "quadraticd")]
    QuadraticDecreasing,
    #[value(name = "quadratici")]
    QuadraticIncreasing,
}

impl Scaling {
    pub fn name(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::LinearDecreasing => "lineard",
            Self::LinearIncreasing => "lineari",
            Self::QuadraticDecreasing => "quadraticd",
            Self::QuadraticIncreasing => "quadratici",
        }
    }

    /// Legend label (name without the direction suffix)
    pub fn label(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::LinearDecreasing | Self::LinearIncreasing => "linear",
            Self::QuadraticDecreasing | Self::QuadraticIncreasing => "quadratic",
        }
    }

    pub fn is_decreasing(self) -> bool {
        matches!(self, Self::LinearDecreasing | Self::QuadraticDecreasing)
    }

    /// Factor applied when the count goes from `from` to `to`
    pub fn ratio(self, from: f64, to: f64) -> f64 {
        match self {
            Self::Constant => 1.0,
            Self::LinearDecreasing => from / to,
            Self::LinearIncreasing => to / from,
            Self::QuadraticDecreasing => (from * from) / (to * to),
            Self::QuadraticIncreasing => (to * to) / (from * from),
        }
    }

    /// Starting value for a curve over `values`
    ///
    /// Decreasing curves start at the largest value, all others at the
    /// smallest. `None` for an empty input.
    pub fn seed(self, values: &[f64]) -> Option<f64> {
        let fold = |f: fn(f64, f64) -> f64| values.iter().copied().reduce(f);
        if self.is_decreasing() {
            fold(f64::max)
        } else {
            fold(f64::min)
        }
    }

    /// Ideal curve over sorted `counts`, starting from `init`
    pub fn ideal_line(self, init: f64, counts: &[f64]) -> Vec<f64> {
        let mut line = Vec::with_capacity(counts.len());
        let mut value = init;

        for (i, count) in counts.iter().enumerate() {
            if i > 0 {
                value *= self.ratio(counts[i - 1], *count);
            }
            line.push(value);
        }

        line
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Scaling {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "constant" => Ok(Self::Constant),
            "lineard" => Ok(Self::LinearDecreasing),
            "lineari" => Ok(Self::LinearIncreasing),
            "quadraticd" => Ok(Self::QuadraticDecreasing),
            "quadratici" => Ok(Self::QuadraticIncreasing),
            other => Err(ProfileError::InvalidInput(format!(
                "Unknown scaling '{}'",
                other
            ))),
        }
    }
}
