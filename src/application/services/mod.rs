//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod simulation;

pub use simulation::{DownlineRequest, SimulationReport, SimulationRequest, SimulationService};
