/// JSON persistence for whole scenarios.
pub mod scenario;

pub use scenario::{LoadError, SaveError, Scenario};
