//! Rescue teams assignable to zones.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Speciality of a rescue team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamKind {
    /// Search and rescue.
    Search,
    /// Medical response.
    Medical,
    /// Supply logistics.
    Logistics,
    /// Fire suppression.
    Firefighting,
}

impl TeamKind {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "Search and rescue",
            Self::Medical => "Medical",
            Self::Logistics => "Logistics",
            Self::Firefighting => "Firefighting",
        }
    }
}

impl fmt::Display for TeamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TeamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "medical" => Ok(Self::Medical),
            "logistics" => Ok(Self::Logistics),
            "firefighting" => Ok(Self::Firefighting),
            other => Err(format!("unknown team kind: {other}")),
        }
    }
}

/// Operational state of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamStatus {
    /// Ready to deploy.
    Available,
    /// Deployed to an emergency.
    OnMission,
    /// Standing down between missions.
    Resting,
    /// Not deployable.
    OutOfService,
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "available",
            Self::OnMission => "on mission",
            Self::Resting => "resting",
            Self::OutOfService => "out of service",
        };
        f.write_str(label)
    }
}

/// A staffed unit that can be relocated between zones and hold resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescueTeam {
    id: String,
    name: String,
    kind: TeamKind,
    location: String,
    status: TeamStatus,
    max_personnel: u32,
    assigned_personnel: u32,
    lead: String,
    years_experience: u32,
    assigned_resources: BTreeSet<String>,
}

impl RescueTeam {
    /// Creates an available, unstaffed team stationed at a zone.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: TeamKind,
        location: impl Into<String>,
        max_personnel: u32,
        lead: impl Into<String>,
        years_experience: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            location: location.into(),
            status: TeamStatus::Available,
            max_personnel,
            assigned_personnel: 0,
            lead: lead.into(),
            years_experience,
            assigned_resources: BTreeSet::new(),
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

    /// Team speciality.
    #[must_use]
    pub fn kind(&self) -> TeamKind {
        self.kind
    }

    /// Id of the zone where the team currently is.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Operational state.
    #[must_use]
    pub fn status(&self) -> TeamStatus {
        self.status
    }

    /// Sets the operational state.
    pub fn set_status(&mut self, status: TeamStatus) {
        self.status = status;
    }

    /// Maximum staffing.
    #[must_use]
    pub fn max_personnel(&self) -> u32 {
        self.max_personnel
    }

    /// Current staffing.
    #[must_use]
    pub fn assigned_personnel(&self) -> u32 {
        self.assigned_personnel
    }

    /// Team lead.
    #[must_use]
    pub fn lead(&self) -> &str {
        &self.lead
    }

    /// Years of experience of the unit.
    #[must_use]
    pub fn years_experience(&self) -> u32 {
        self.years_experience
    }

    /// Ids of the resources this team carries.
    #[must_use]
    pub fn assigned_resources(&self) -> &BTreeSet<String> {
        &self.assigned_resources
    }

    /// Whether the team can take a new assignment.
    #[must_use]
    pub fn can_deploy(&self) -> bool {
        self.status == TeamStatus::Available && self.assigned_personnel > 0
    }

    /// Moves the team to a zone and makes it available there.
    pub fn deploy_to(&mut self, zone: impl Into<String>) {
        self.location = zone.into();
        self.status = TeamStatus::Available;
    }

    /// Adds personnel to the team. Returns `false` if the result would
    /// exceed the maximum staffing.
    pub fn assign_personnel(&mut self, count: u32) -> bool {
        if count == 0 || self.assigned_personnel + count > self.max_personnel {
            return false;
        }
        self.assigned_personnel += count;
        true
    }

    /// Withdraws personnel from the team. Returns `false` if more would be
    /// removed than are assigned.
    pub fn withdraw_personnel(&mut self, count: u32) -> bool {
        if count == 0 || count > self.assigned_personnel {
            return false;
        }
        self.assigned_personnel -= count;
        true
    }

    /// Attaches a resource. Returns `false` if the team already holds it.
    pub fn assign_resource(&mut self, resource_id: impl Into<String>) -> bool {
        self.assigned_resources.insert(resource_id.into())
    }

    /// Detaches a resource. Returns `false` if the team did not hold it.
    pub fn remove_resource(&mut self, resource_id: &str) -> bool {
        self.assigned_resources.remove(resource_id)
    }

    /// Staffing as a fraction of the maximum, in `[0.0, 1.0]`.
    #[must_use]
    pub fn staffing_ratio(&self) -> f64 {
        if self.max_personnel == 0 {
            return 0.0;
        }
        f64::from(self.assigned_personnel) / f64::from(self.max_personnel)
    }
}

#[cfg(test)]
mod tests {
    use super::{RescueTeam, TeamKind, TeamStatus};

    fn team() -> RescueTeam {
        RescueTeam::new("T1", "Alpha", TeamKind::Search, "Z1", 12, "M. Rojas", 8)
    }

    #[test]
    fn staffing_respects_bounds() {
        let mut t = team();
        assert!(!t.can_deploy()); // unstaffed

        assert!(t.assign_personnel(10));
        assert!(!t.assign_personnel(5));
        assert!(t.can_deploy());

        assert!(t.withdraw_personnel(4));
        assert!(!t.withdraw_personnel(10));
        assert_eq!(t.assigned_personnel(), 6);
    }

    #[test]
    fn deploying_relocates_and_resets_status() {
        let mut t = team();
        t.set_status(TeamStatus::Resting);
        t.deploy_to("Z9");
        assert_eq!(t.location(), "Z9");
        assert_eq!(t.status(), TeamStatus::Available);
    }

    #[test]
    fn resources_do_not_duplicate() {
        let mut t = team();
        assert!(t.assign_resource("R1"));
        assert!(!t.assign_resource("R1"));
        assert!(t.remove_resource("R1"));
        assert!(!t.remove_resource("R1"));
    }
}
