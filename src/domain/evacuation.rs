//! Evacuations and their state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Level, Route};

/// Lifecycle state of an evacuation.
///
/// Valid transitions: `Planned → InProgress → Completed`, with `Cancelled`
/// and `Suspended` reachable from `InProgress` (and `Suspended → InProgress`
/// on resume). Completion can also happen implicitly when everyone has been
/// moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvacuationStatus {
    /// Scheduled but not started.
    Planned,
    /// People are being moved.
    InProgress,
    /// Everyone accounted for.
    Completed,
    /// Abandoned before completion.
    Cancelled,
    /// Paused mid-operation.
    Suspended,
}

impl EvacuationStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for EvacuationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Planned => "planned",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Suspended => "suspended",
        };
        f.write_str(label)
    }
}

/// A state transition that the evacuation lifecycle does not permit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot move evacuation from {from} to {to}")]
pub struct TransitionError {
    /// State the evacuation was in.
    pub from: EvacuationStatus,
    /// State the caller asked for.
    pub to: EvacuationStatus,
}

/// The routing facts an evacuation captures when it is planned.
///
/// A snapshot rather than a live reference. The priority score reads the
/// distance and risk stored here, so holders that mutate routes refresh the
/// snapshot (see [`Evacuation::set_route`]) when re-prioritizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    /// Route id.
    pub id: String,
    /// Distance at planning time.
    pub distance: f64,
    /// Risk level at planning time.
    pub risk_level: f64,
    /// Estimated travel time at planning time.
    pub travel_time: f64,
}

impl From<&Route> for RouteSnapshot {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id().to_string(),
            distance: route.distance(),
            risk_level: route.risk_level(),
            travel_time: route.travel_time(),
        }
    }
}

/// A unit of work moving people from one zone toward another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evacuation {
    id: String,
    name: String,
    route: Option<RouteSnapshot>,
    origin: String,
    destination: String,
    urgency: Level,
    to_evacuate: u32,
    evacuated: u32,
    status: EvacuationStatus,
    responsible: String,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Evacuation {
    /// Creates a planned evacuation between two zones, optionally following
    /// a route.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        to_evacuate: u32,
        urgency: Level,
        responsible: impl Into<String>,
        route: Option<RouteSnapshot>,
    ) -> Self {
        let id = id.into();
        let name = format!("Evacuation {id}");
        Self {
            id,
            name,
            route,
            origin: origin.into(),
            destination: destination.into(),
            urgency,
            to_evacuate,
            evacuated: 0,
            status: EvacuationStatus::Planned,
            responsible: responsible.into(),
            started_at: Utc::now(),
            finished_at: None,
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

    /// Route snapshot captured at planning time, if a route existed.
    #[must_use]
    pub fn route(&self) -> Option<&RouteSnapshot> {
        self.route.as_ref()
    }

    /// Replaces the route snapshot with a fresher view of the route.
    pub fn set_route(&mut self, route: Option<RouteSnapshot>) {
        self.route = route;
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

    /// Urgency grading.
    #[must_use]
    pub fn urgency(&self) -> Level {
        self.urgency
    }

    /// Re-grades the urgency. The queue must be re-prioritized afterwards
    /// for the change to affect ordering.
    pub fn set_urgency(&mut self, urgency: Level) {
        self.urgency = urgency;
    }

    /// Number of people to move.
    #[must_use]
    pub fn to_evacuate(&self) -> u32 {
        self.to_evacuate
    }

    /// Number of people moved so far.
    #[must_use]
    pub fn evacuated(&self) -> u32 {
        self.evacuated
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> EvacuationStatus {
        self.status
    }

    /// Party responsible for the operation.
    #[must_use]
    pub fn responsible(&self) -> &str {
        &self.responsible
    }

    /// When the evacuation was created.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the evacuation reached a terminal state, if it has.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Composite priority score used to order the evacuation queue.
    ///
    /// Urgency weight (1-4), plus a population bonus (+3 over 10000 people,
    /// +2 over 5000, +1 over 1000), plus a route bonus (+1 for distance over
    /// 100, +2 for risk over 0.7). Computed on demand, never cached.
    #[must_use]
    pub fn priority_score(&self) -> u32 {
        let mut score = self.urgency.value();

        if self.to_evacuate > 10_000 {
            score += 3;
        } else if self.to_evacuate > 5_000 {
            score += 2;
        } else if self.to_evacuate > 1_000 {
            score += 1;
        }

        if let Some(route) = &self.route {
            if route.distance > 100.0 {
                score += 1;
            }
            if route.risk_level > 0.7 {
                score += 2;
            }
        }

        score
    }

    /// Completed fraction as a percentage.
    #[must_use]
    pub fn percent_complete(&self) -> f64 {
        if self.to_evacuate == 0 {
            return 0.0;
        }
        f64::from(self.evacuated) / f64::from(self.to_evacuate) * 100.0
    }

    /// Whether everyone has been moved (or the evacuation was explicitly
    /// completed).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == EvacuationStatus::Completed
            || (self.to_evacuate > 0 && self.evacuated >= self.to_evacuate)
    }

    /// Estimated duration in hours: route travel time plus half an hour per
    /// hundred people.
    #[must_use]
    pub fn estimated_duration(&self) -> f64 {
        let Some(route) = &self.route else {
            return 0.0;
        };
        route.travel_time + f64::from(self.to_evacuate) / 100.0 * 0.5
    }

    /// Records progress, clamping to the number of people to move.
    ///
    /// Transitions to in-progress on the first movement and completes
    /// implicitly once everyone has been moved.
    pub fn update_progress(&mut self, evacuated: u32) {
        self.evacuated = evacuated.min(self.to_evacuate);

        if self.is_complete() {
            self.status = EvacuationStatus::Completed;
            self.finished_at = Some(Utc::now());
        } else if self.evacuated > 0 && self.status == EvacuationStatus::Planned {
            self.status = EvacuationStatus::InProgress;
        }
    }

    /// Starts a planned evacuation.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the evacuation is planned.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(EvacuationStatus::Planned, EvacuationStatus::InProgress)
    }

    /// Suspends an in-progress evacuation.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the evacuation is in progress.
    pub fn suspend(&mut self) -> Result<(), TransitionError> {
        self.transition(EvacuationStatus::InProgress, EvacuationStatus::Suspended)
    }

    /// Resumes a suspended evacuation.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the evacuation is suspended.
    pub fn resume(&mut self) -> Result<(), TransitionError> {
        self.transition(EvacuationStatus::Suspended, EvacuationStatus::InProgress)
    }

    /// Cancels an evacuation that has not yet finished.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] if the evacuation is already terminal.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError {
                from: self.status,
                to: EvacuationStatus::Cancelled,
            });
        }
        self.status = EvacuationStatus::Cancelled;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Explicitly completes an evacuation that has not yet finished.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] if the evacuation is already terminal,
    /// e.g. completing one that was cancelled.
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError {
                from: self.status,
                to: EvacuationStatus::Completed,
            });
        }
        self.status = EvacuationStatus::Completed;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    fn transition(
        &mut self,
        expected: EvacuationStatus,
        next: EvacuationStatus,
    ) -> Result<(), TransitionError> {
        if self.status != expected {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Evacuation, EvacuationStatus, RouteSnapshot};
    use crate::domain::Level;

    fn evacuation(people: u32, route: Option<RouteSnapshot>) -> Evacuation {
        Evacuation::new("EV1", "Z1", "Z2", people, Level::High, "ops", route)
    }

    fn snapshot(distance: f64, risk: f64) -> RouteSnapshot {
        RouteSnapshot {
            id: "R1".to_string(),
            distance,
            risk_level: risk,
            travel_time: 0.8,
        }
    }

    #[test]
    fn score_without_route_is_urgency_plus_population_bonus() {
        assert_eq!(evacuation(500, None).priority_score(), 3);
        assert_eq!(evacuation(1_500, None).priority_score(), 4);
        assert_eq!(evacuation(6_000, None).priority_score(), 5);
        assert_eq!(evacuation(12_000, None).priority_score(), 6);
    }

    #[test]
    fn route_distance_and_risk_add_to_score() {
        let short_and_safe = evacuation(500, Some(snapshot(15.0, 0.1)));
        assert_eq!(short_and_safe.priority_score(), 3);

        let long_and_risky = evacuation(500, Some(snapshot(150.0, 0.9)));
        assert_eq!(long_and_risky.priority_score(), 6);
    }

    #[test]
    fn progress_clamps_and_completes_implicitly() {
        let mut ev = evacuation(100, None);
        ev.update_progress(40);
        assert_eq!(ev.status(), EvacuationStatus::InProgress);
        assert_eq!(ev.evacuated(), 40);

        ev.update_progress(250);
        assert_eq!(ev.evacuated(), 100);
        assert_eq!(ev.status(), EvacuationStatus::Completed);
        assert!(ev.finished_at().is_some());
    }

    #[test]
    fn completing_a_cancelled_evacuation_fails() {
        let mut ev = evacuation(100, None);
        ev.start().unwrap();
        ev.cancel().unwrap();

        let err = ev.complete().unwrap_err();
        assert_eq!(err.from, EvacuationStatus::Cancelled);
        assert_eq!(err.to, EvacuationStatus::Completed);
    }

    #[test]
    fn suspend_requires_in_progress() {
        let mut ev = evacuation(100, None);
        assert!(ev.suspend().is_err());

        ev.start().unwrap();
        ev.suspend().unwrap();
        assert_eq!(ev.status(), EvacuationStatus::Suspended);

        ev.resume().unwrap();
        assert_eq!(ev.status(), EvacuationStatus::InProgress);
    }
}
