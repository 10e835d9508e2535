//! Tier catalog: membership levels and their bonus parameters.
//!
//! The catalog is a compiled-in, read-only table shared by every caller.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Membership level with the parameters that drive both bonus formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    /// Display name, e.g. "Pre-Junior"
    pub name: &'static str,
    /// Fraction of the weaker leg paid as team bonus (0..=1)
    pub team_bonus_rate: f64,
    /// Number of downline generations eligible for the elite bonus
    pub elite_depth: usize,
    /// Terminal color used when rendering the tier
    #[serde(skip)]
    pub accent: &'static str,
}

static CATALOG: [Tier; 4] = [
    Tier {
        name: "Pre-Junior",
        team_bonus_rate: 0.05,
        elite_depth: 0,
        accent: "white",
    },
    Tier {
        name: "Junior",
        team_bonus_rate: 0.07,
        elite_depth: 0,
        accent: "cyan",
    },
    Tier {
        name: "Senior",
        team_bonus_rate: 0.08,
        elite_depth: 3,
        accent: "green",
    },
    Tier {
        name: "Master",
        team_bonus_rate: 0.10,
        elite_depth: 6,
        accent: "yellow",
    },
];

/// All tiers, lowest first.
pub fn tiers() -> &'static [Tier] {
    &CATALOG
}

/// Resolve a tier by name (ASCII case-insensitive).
#[instrument(level = "trace")]
pub fn lookup_tier(name: &str) -> DomainResult<&'static Tier> {
    let name = name.trim();
    CATALOG
        .iter()
        .find(|tier| tier.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| DomainError::UnknownTier(name.to_string()))
}

impl Tier {
    /// True when the tier earns any elite bonus at all.
    pub fn has_elite(&self) -> bool {
        self.elite_depth > 0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_tier(s).copied()
    }
}
