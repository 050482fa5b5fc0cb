//! Urgency / risk levels.
//!
//! A [`Level`] grades both the risk of a zone and the urgency of an
//! evacuation. The numeric weight, label and display color for each variant
//! come from a fixed attribute table rather than per-variant methods, so the
//! enum itself stays a plain tag.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Urgency or risk grading, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Routine monitoring only.
    Low,
    /// Elevated attention required.
    Medium,
    /// Priority response required.
    High,
    /// Immediate response required.
    Critical,
}

/// Per-level attributes: numeric weight, label, display color.
const ATTRIBUTES: [(Level, u32, &str, &str); 4] = [
    (Level::Low, 1, "Low", "green"),
    (Level::Medium, 2, "Medium", "yellow"),
    (Level::High, 3, "High", "orange"),
    (Level::Critical, 4, "Critical", "red"),
];

impl Level {
    fn attributes(self) -> (u32, &'static str, &'static str) {
        let (_, value, label, color) = ATTRIBUTES[self as usize];
        (value, label, color)
    }

    /// Numeric weight used in priority arithmetic (1 for [`Level::Low`]
    /// through 4 for [`Level::Critical`]).
    #[must_use]
    pub fn value(self) -> u32 {
        self.attributes().0
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.attributes().1
    }

    /// Display color name used by front ends.
    #[must_use]
    pub fn color(self) -> &'static str {
        self.attributes().2
    }

    /// Derives the risk level of a zone from its affected population.
    ///
    /// Thresholds are fixed: above 5000 people is [`Level::Critical`], above
    /// 2000 [`Level::High`], above 500 [`Level::Medium`], otherwise
    /// [`Level::Low`].
    #[must_use]
    pub fn for_population(population: u32) -> Self {
        if population > 5000 {
            Self::Critical
        } else if population > 2000 {
            Self::High
        } else if population > 500 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Level;

    #[test]
    fn values_are_ordered() {
        assert!(Level::Low < Level::Medium);
        assert!(Level::Medium < Level::High);
        assert!(Level::High < Level::Critical);
        assert_eq!(Level::Low.value(), 1);
        assert_eq!(Level::Critical.value(), 4);
    }

    #[test]
    fn population_thresholds() {
        assert_eq!(Level::for_population(0), Level::Low);
        assert_eq!(Level::for_population(500), Level::Low);
        assert_eq!(Level::for_population(501), Level::Medium);
        assert_eq!(Level::for_population(2001), Level::High);
        assert_eq!(Level::for_population(5001), Level::Critical);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("CRITICAL".parse::<Level>().unwrap(), Level::Critical);
        assert!("urgent".parse::<Level>().is_err());
    }
}
