//! Domain layer: the compensation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod bonus;
pub mod builder;
pub mod entities;
pub mod error;
pub mod tier;

pub use arena::{Edge, Network, NodeData, TreeNode, ROOT_LABEL};
pub use bonus::{compute_elite_bonus, compute_team_bonus, compute_team_bonus_capped, GENERATION_RATE};
pub use builder::{build_network, NetworkBuilder, ParentAssignment, RoundRobin};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use tier::{lookup_tier, tiers, Tier};
