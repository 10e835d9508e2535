//! mlmsim: compensation plan simulator
//!
//! The engine in [`domain`] is pure and stateless: a tier catalog, the team and
//! elite bonus formulas, a default downline generator and the network builder.
//! [`application`] layers configured defaults on top, [`cli`] is a thin adapter.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    build_network, compute_elite_bonus, compute_team_bonus, generate_downline, lookup_tier,
    DomainError, DomainResult, Downline, EliteBonus, GenerationRecord, Network, TeamBonus, Tier,
};
