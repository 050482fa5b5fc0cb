//! Geographic zones affected by a disaster.

use serde::{Deserialize, Serialize};

use crate::domain::Level;

/// A geographic area with an affected population and a derived risk level.
///
/// The risk level is recomputed from the population whenever the population
/// changes; it is never set directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    id: String,
    name: String,
    x: f64,
    y: f64,
    affected_population: u32,
    risk_level: Level,
    active: bool,
}

impl Zone {
    /// Creates a zone at the given coordinates with an initial affected
    /// population. The risk level is derived from the population.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        x: f64,
        y: f64,
        affected_population: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            y,
            affected_population,
            risk_level: Level::for_population(affected_population),
            active: true,
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X coordinate.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Number of people currently affected in this zone.
    #[must_use]
    pub fn affected_population(&self) -> u32 {
        self.affected_population
    }

    /// Updates the affected population and recomputes the risk level.
    pub fn set_affected_population(&mut self, population: u32) {
        self.affected_population = population;
        self.risk_level = Level::for_population(population);
    }

    /// Current risk level, derived from the affected population.
    #[must_use]
    pub fn risk_level(&self) -> Level {
        self.risk_level
    }

    /// Whether the zone is still part of active operations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the zone active or inactive.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the zone demands immediate attention: critical risk, or high
    /// risk with a large affected population.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.risk_level == Level::Critical
            || (self.risk_level == Level::High && self.affected_population > 4000)
    }

    /// Composite evacuation priority: risk weight doubled plus one point per
    /// thousand affected people.
    #[must_use]
    pub fn evacuation_priority(&self) -> u32 {
        self.risk_level.value() * 2 + self.affected_population / 1000
    }

    /// Euclidean distance to another zone.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::Zone;
    use crate::domain::Level;

    #[test]
    fn risk_level_tracks_population() {
        let mut zone = Zone::new("Z1", "North ridge", 0.0, 0.0, 100);
        assert_eq!(zone.risk_level(), Level::Low);

        zone.set_affected_population(15_000);
        assert_eq!(zone.risk_level(), Level::Critical);
        assert!(zone.is_critical());

        zone.set_affected_population(0);
        assert_eq!(zone.risk_level(), Level::Low);
        assert!(!zone.is_critical());
    }

    #[test]
    fn evacuation_priority_combines_risk_and_population() {
        let zone = Zone::new("Z1", "North ridge", 0.0, 0.0, 3000);
        // High risk (3 * 2) plus 3 points for population.
        assert_eq!(zone.evacuation_priority(), 9);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Zone::new("A", "a", 0.0, 0.0, 0);
        let b = Zone::new("B", "b", 3.0, 4.0, 0);
        assert!((a.distance_to(&b) - 5.0).abs() < f64::EPSILON);
    }
}
