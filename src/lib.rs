//! Evacuation and resource-distribution planning for disaster-affected
//! zones.
//!
//! A scenario is a set of zones connected by directed routes, with resources,
//! rescue teams and users registered against them. Evacuations are queued by
//! a composite priority score and resources are spread through hierarchical
//! distribution trees. Everything lives in memory; [`storage`] persists whole
//! scenarios as JSON.

pub mod domain;

/// Planner configuration.
pub mod config;
/// Orchestration facade tying the structures together.
pub mod coordinator;
/// Hierarchical resource allocation.
pub mod distribution;
/// The directed routing graph.
pub mod graph;
/// The bidirectional resource-route index.
pub mod index;
/// The priority queue over pending evacuations.
pub mod queue;
/// JSON persistence for whole scenarios.
pub mod storage;

pub use config::Config;
pub use coordinator::{Coordinator, Error, Statistics};
pub use distribution::{Allocation, DistributionNode, DistributionTree};
pub use graph::RouteGraph;
pub use index::ResourceRouteIndex;
pub use queue::EvacuationQueue;
pub use storage::Scenario;
