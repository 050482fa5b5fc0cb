//! Quantifiable supplies located at zones.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of a resource, each carrying a fixed base priority weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Food and water.
    Food,
    /// Medical supplies.
    Medicine,
    /// Rescue and construction equipment.
    Equipment,
}

/// Base priority weight per kind.
const BASE_PRIORITIES: [(ResourceKind, u32); 3] = [
    (ResourceKind::Food, 3),
    (ResourceKind::Medicine, 4),
    (ResourceKind::Equipment, 5),
];

impl ResourceKind {
    /// Fixed base priority weight for this kind.
    #[must_use]
    pub fn base_priority(self) -> u32 {
        BASE_PRIORITIES[self as usize].1
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Medicine => "Medicine",
            Self::Equipment => "Equipment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "medicine" => Ok(Self::Medicine),
            "equipment" => Ok(Self::Equipment),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

/// Availability state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    /// Full stock on hand.
    Available,
    /// Partially reserved.
    InUse,
    /// Nothing left.
    Exhausted,
    /// Past its expiry date.
    Expired,
    /// Unusable.
    Damaged,
    /// Being moved between zones.
    InTransit,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "available",
            Self::InUse => "in use",
            Self::Exhausted => "exhausted",
            Self::Expired => "expired",
            Self::Damaged => "damaged",
            Self::InTransit => "in transit",
        };
        f.write_str(label)
    }
}

/// A quantifiable supply item held at a zone.
///
/// `available` never exceeds `total`; reservations and releases keep the
/// status in step with the remaining stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    id: String,
    name: String,
    kind: ResourceKind,
    total: u32,
    available: u32,
    unit: String,
    zone: String,
    status: ResourceStatus,
    expires: Option<NaiveDate>,
    priority: u32,
}

impl Resource {
    /// Creates a fully stocked resource located at a zone. The priority
    /// starts at the kind's base weight.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ResourceKind,
        total: u32,
        unit: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            total,
            available: total,
            unit: unit.into(),
            zone: zone.into(),
            status: ResourceStatus::Available,
            expires: None,
            priority: kind.base_priority(),
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

    /// Resource category.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Total stock, reserved or not.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Unreserved stock.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.available
    }

    /// Unit of measure.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Id of the zone holding the stock.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Current availability state.
    #[must_use]
    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    /// Marks the resource with an explicit status (damaged, in transit).
    pub fn set_status(&mut self, status: ResourceStatus) {
        self.status = status;
    }

    /// Expiry date, if the resource is perishable.
    #[must_use]
    pub fn expires(&self) -> Option<NaiveDate> {
        self.expires
    }

    /// Sets the expiry date.
    pub fn set_expires(&mut self, expires: Option<NaiveDate>) {
        self.expires = expires;
    }

    /// Own priority weight (at least 1).
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Sets the own priority weight, floored at 1.
    pub fn set_priority(&mut self, priority: u32) {
        self.priority = priority.max(1);
    }

    /// Fraction of the stock still available, as a percentage.
    #[must_use]
    pub fn percent_available(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.available) / f64::from(self.total) * 100.0
    }

    /// Whether the resource can be drawn from right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == ResourceStatus::Available && self.available > 0
    }

    /// Whether the expiry date has passed as of `today`.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires.is_some_and(|d| d < today)
    }

    /// Effective priority: own weight plus the kind's base weight, +2 when
    /// expiring within a week of `today`, +3 when under 20% stock.
    #[must_use]
    pub fn computed_priority(&self, today: NaiveDate) -> u32 {
        let mut priority = self.priority + self.kind.base_priority();

        if self
            .expires
            .is_some_and(|d| d < today + chrono::Days::new(7))
        {
            priority += 2;
        }

        if self.percent_available() < 20.0 {
            priority += 3;
        }

        priority
    }

    /// Reserves `quantity` units. Returns `false` (leaving the stock
    /// untouched) when the quantity is zero or exceeds what is available.
    pub fn reserve(&mut self, quantity: u32) -> bool {
        if quantity == 0 || quantity > self.available {
            return false;
        }

        self.available -= quantity;
        self.status = if self.available == 0 {
            ResourceStatus::Exhausted
        } else {
            ResourceStatus::InUse
        };
        true
    }

    /// Returns `quantity` units to the pool, capped at the total stock.
    pub fn release(&mut self, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.available = self.total.min(self.available + quantity);
        if self.available == self.total {
            self.status = ResourceStatus::Available;
        }
    }

    /// Adds new stock to both the total and the available pool.
    pub fn restock(&mut self, quantity: u32) {
        self.total += quantity;
        self.available += quantity;
    }

    /// Reconciles the status with the expiry date and stock counters.
    pub fn refresh_status(&mut self, today: NaiveDate) {
        self.status = if self.is_expired(today) {
            ResourceStatus::Expired
        } else if self.available == 0 {
            ResourceStatus::Exhausted
        } else if self.available < self.total {
            ResourceStatus::InUse
        } else {
            ResourceStatus::Available
        };
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Resource, ResourceKind, ResourceStatus};

    fn water() -> Resource {
        Resource::new("R1", "Bottled water", ResourceKind::Food, 1000, "litres", "Z1")
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn oversized_reservation_is_rejected() {
        let mut r = water();
        assert!(!r.reserve(1200));
        assert_eq!(r.available(), 1000);
        assert_eq!(r.status(), ResourceStatus::Available);

        assert!(r.reserve(200));
        assert_eq!(r.available(), 800);
        assert_eq!(r.status(), ResourceStatus::InUse);
    }

    #[test]
    fn reserve_and_release_conserve_stock() {
        let mut r = water();
        assert!(r.reserve(600));
        assert!(r.reserve(400));
        assert_eq!(r.status(), ResourceStatus::Exhausted);
        assert_eq!(r.available(), 0);

        r.release(250);
        assert_eq!(r.available(), 250);
        assert_eq!(r.status(), ResourceStatus::Exhausted); // release alone does not reopen

        r.release(5000);
        assert_eq!(r.available(), 1000);
        assert_eq!(r.status(), ResourceStatus::Available);
    }

    #[test]
    fn computed_priority_reflects_expiry_and_scarcity() {
        let mut r = water();
        let today = day(2024, 6, 1);
        // Own priority 3 plus base 3.
        assert_eq!(r.computed_priority(today), 6);

        r.set_expires(Some(day(2024, 6, 4)));
        assert_eq!(r.computed_priority(today), 8);

        assert!(r.reserve(850));
        assert_eq!(r.computed_priority(today), 11);
    }

    #[test]
    fn refresh_flags_expired_stock() {
        let mut r = water();
        r.set_expires(Some(day(2024, 1, 1)));
        r.refresh_status(day(2024, 3, 1));
        assert_eq!(r.status(), ResourceStatus::Expired);
    }
}
