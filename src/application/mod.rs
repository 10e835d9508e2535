//! Application layer: services and use cases
//!
//! This layer resolves names and settings into domain calls.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{DownlineRequest, SimulationReport, SimulationRequest, SimulationService};
