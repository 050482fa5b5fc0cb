//! Directed routes between zones.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How a route is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    /// Roads and rail.
    Land,
    /// Aircraft.
    Air,
    /// Boats and ships.
    Sea,
}

impl TransportMode {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Land => "Land",
            Self::Air => "Air",
            Self::Sea => "Sea",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "land" => Ok(Self::Land),
            "air" => Ok(Self::Air),
            "sea" => Ok(Self::Sea),
            other => Err(format!("unknown transport mode: {other}")),
        }
    }
}

/// A directed, weighted connection between two zones.
///
/// Origin, destination, distance, travel time and mode are fixed at creation;
/// only the risk level and the current capacity change over a route's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    id: String,
    origin: String,
    destination: String,
    distance: f64,
    travel_time: f64,
    mode: TransportMode,
    risk_level: f64,
    max_capacity: u32,
    current_capacity: u32,
    active: bool,
}

impl Route {
    /// Creates a route. Risk starts at zero and capacities at zero; use
    /// [`Route::set_risk_level`] and [`Route::set_max_capacity`] to populate
    /// them.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        distance: f64,
        travel_time: f64,
        mode: TransportMode,
    ) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            destination: destination.into(),
            distance,
            travel_time,
            mode,
            risk_level: 0.0,
            max_capacity: 0,
            current_capacity: 0,
            active: true,
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Origin zone id.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Destination zone id.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Distance in kilometres.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Estimated travel time in hours.
    #[must_use]
    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    /// Transport mode.
    #[must_use]
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Risk level in `[0.0, 1.0]`.
    #[must_use]
    pub fn risk_level(&self) -> f64 {
        self.risk_level
    }

    /// Sets the risk level, clamped to `[0.0, 1.0]`.
    pub fn set_risk_level(&mut self, risk: f64) {
        self.risk_level = risk.clamp(0.0, 1.0);
    }

    /// Maximum simultaneous occupancy.
    #[must_use]
    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Sets the maximum capacity, clamping the current occupancy down if
    /// needed.
    pub fn set_max_capacity(&mut self, max: u32) {
        self.max_capacity = max;
        self.current_capacity = self.current_capacity.min(max);
    }

    /// Current occupancy.
    #[must_use]
    pub fn current_capacity(&self) -> u32 {
        self.current_capacity
    }

    /// Replaces the current occupancy. Returns `false` if the value exceeds
    /// the maximum.
    pub fn set_current_capacity(&mut self, current: u32) -> bool {
        if current > self.max_capacity {
            return false;
        }
        self.current_capacity = current;
        true
    }

    /// Adds to the current occupancy. Returns `false` if the result would
    /// exceed the maximum.
    pub fn increase_capacity(&mut self, amount: u32) -> bool {
        if amount == 0 || self.current_capacity + amount > self.max_capacity {
            return false;
        }
        self.current_capacity += amount;
        true
    }

    /// Removes from the current occupancy. Returns `false` if more would be
    /// removed than is present.
    pub fn decrease_capacity(&mut self, amount: u32) -> bool {
        if amount == 0 || amount > self.current_capacity {
            return false;
        }
        self.current_capacity -= amount;
        true
    }

    /// Whether the route is open for traffic.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the route open or closed.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Occupancy as a percentage of the maximum capacity.
    #[must_use]
    pub fn occupancy_percent(&self) -> f64 {
        if self.max_capacity == 0 {
            return 0.0;
        }
        f64::from(self.current_capacity) / f64::from(self.max_capacity) * 100.0
    }

    /// Remaining capacity.
    #[must_use]
    pub fn available_capacity(&self) -> u32 {
        self.max_capacity.saturating_sub(self.current_capacity)
    }

    /// Average speed over the route, in distance units per hour.
    #[must_use]
    pub fn average_speed(&self) -> f64 {
        if self.travel_time == 0.0 {
            return 0.0;
        }
        self.distance / self.travel_time
    }

    /// Whether occupancy is above 80% of capacity.
    #[must_use]
    pub fn is_congested(&self) -> bool {
        self.occupancy_percent() > 80.0
    }

    /// Whether the route is considered safe to traverse: low risk and not
    /// congested.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.risk_level < 0.5 && !self.is_congested()
    }

    /// Travel time adjusted for congestion (x1.5) and elevated risk (x1.3).
    #[must_use]
    pub fn travel_time_with_traffic(&self) -> f64 {
        let congestion = if self.is_congested() { 1.5 } else { 1.0 };
        let risk = if self.risk_level > 0.7 { 1.3 } else { 1.0 };
        self.travel_time * congestion * risk
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, TransportMode};

    fn route() -> Route {
        let mut route = Route::new("R1", "Z1", "Z2", 120.0, 2.0, TransportMode::Land);
        route.set_max_capacity(100);
        route
    }

    #[test]
    fn capacity_stays_within_bounds() {
        let mut r = route();
        assert!(r.increase_capacity(90));
        assert!(!r.increase_capacity(20));
        assert_eq!(r.current_capacity(), 90);
        assert!(r.decrease_capacity(40));
        assert!(!r.decrease_capacity(60));
        assert_eq!(r.current_capacity(), 50);
    }

    #[test]
    fn risk_is_clamped() {
        let mut r = route();
        r.set_risk_level(1.7);
        assert!((r.risk_level() - 1.0).abs() < f64::EPSILON);
        r.set_risk_level(-0.3);
        assert!(r.risk_level().abs() < f64::EPSILON);
    }

    #[test]
    fn congestion_slows_the_route() {
        let mut r = route();
        assert!((r.travel_time_with_traffic() - 2.0).abs() < f64::EPSILON);
        r.set_current_capacity(95);
        assert!(r.is_congested());
        assert!(!r.is_safe());
        assert!((r.travel_time_with_traffic() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_speed_handles_zero_time() {
        let mut r = route();
        assert!((r.average_speed() - 60.0).abs() < f64::EPSILON);
        r = Route::new("R2", "Z1", "Z2", 10.0, 0.0, TransportMode::Air);
        assert!(r.average_speed().abs() < f64::EPSILON);
    }
}
