//! Entity model: zones, routes, evacuations, resources, teams and users.
//!
//! These are plain records with derived metrics. The structural modules
//! ([`crate::graph`], [`crate::queue`], [`crate::distribution`],
//! [`crate::index`]) build on top of them; data flows one way from here into
//! those structures.

mod evacuation;
mod level;
mod resource;
mod route;
mod team;
mod user;
mod zone;

pub use evacuation::{Evacuation, EvacuationStatus, RouteSnapshot, TransitionError};
pub use level::Level;
pub use resource::{Resource, ResourceKind, ResourceStatus};
pub use route::{Route, TransportMode};
pub use team::{RescueTeam, TeamKind, TeamStatus};
pub use user::{Capability, Role, User};
pub use zone::Zone;
