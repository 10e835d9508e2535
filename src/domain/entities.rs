//! Domain entities: downline records and bonus results

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::error::{ensure_volume, DomainError, DomainResult};

/// Affiliates recruited into generation one by the default generator.
pub const DEFAULT_FIRST_GEN_COUNT: u32 = 5;

/// Affiliates per generation beyond the first for the default generator.
pub const DEFAULT_OTHER_GEN_COUNT: u32 = 3;

/// One level of the downline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationRecord {
    pub affiliate_count: u32,
    pub bv_per_affiliate: f64,
}

impl GenerationRecord {
    /// Create a record from caller-controlled values.
    ///
    /// Counts arrive signed so that negative input is reported instead of wrapped.
    pub fn new(affiliate_count: i64, bv_per_affiliate: f64) -> DomainResult<Self> {
        let affiliate_count = u32::try_from(affiliate_count).map_err(|_| {
            DomainError::invalid_parameter(
                "affiliate_count",
                format!("must be between 0 and {}, got {affiliate_count}", u32::MAX),
            )
        })?;
        Ok(Self {
            affiliate_count,
            bv_per_affiliate: ensure_volume("bv_per_affiliate", bv_per_affiliate)?,
        })
    }

    /// Business volume produced by the whole generation.
    pub fn volume(&self) -> f64 {
        f64::from(self.affiliate_count) * self.bv_per_affiliate
    }

    pub(crate) fn validate(&self) -> DomainResult<()> {
        ensure_volume("bv_per_affiliate", self.bv_per_affiliate).map(|_| ())
    }
}

/// Parses `COUNT:BV`, e.g. `5:200` or `3:150.5`.
impl FromStr for GenerationRecord {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, bv) = s.split_once(':').ok_or_else(|| {
            DomainError::invalid_parameter("generation", format!("expected COUNT:BV, got '{s}'"))
        })?;
        let count: i64 = count.trim().parse().map_err(|_| {
            DomainError::invalid_parameter("affiliate_count", format!("not an integer: '{count}'"))
        })?;
        let bv: f64 = bv.trim().parse().map_err(|_| {
            DomainError::invalid_parameter("bv_per_affiliate", format!("not a number: '{bv}'"))
        })?;
        Self::new(count, bv)
    }
}

impl fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.affiliate_count, self.bv_per_affiliate)
    }
}

/// Ordered generations, index 0 is generation one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Downline(Vec<GenerationRecord>);

impl Downline {
    pub fn new(generations: Vec<GenerationRecord>) -> Self {
        Self(generations)
    }

    /// Default downline with the standard 5-then-3 fan-out.
    pub fn generate_default(generation_count: i64, bv_per_affiliate: f64) -> DomainResult<Self> {
        generate_downline(
            generation_count,
            bv_per_affiliate,
            i64::from(DEFAULT_FIRST_GEN_COUNT),
            i64::from(DEFAULT_OTHER_GEN_COUNT),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenerationRecord> {
        self.0.iter()
    }

    /// Record for a 1-based generation index.
    pub fn generation(&self, generation: usize) -> Option<&GenerationRecord> {
        generation.checked_sub(1).and_then(|idx| self.0.get(idx))
    }

    pub fn generations(&self) -> &[GenerationRecord] {
        &self.0
    }

    pub fn total_affiliates(&self) -> u64 {
        self.0.iter().map(|g| u64::from(g.affiliate_count)).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, g| acc + g.volume())
    }
}

impl From<Vec<GenerationRecord>> for Downline {
    fn from(generations: Vec<GenerationRecord>) -> Self {
        Self(generations)
    }
}

impl<'a> IntoIterator for &'a Downline {
    type Item = &'a GenerationRecord;
    type IntoIter = std::slice::Iter<'a, GenerationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a downline with a constant BV per affiliate.
///
/// Generation one gets `first_gen_count` affiliates, every later generation
/// `other_gen_count`. A count of zero yields an empty downline.
#[instrument(level = "debug")]
pub fn generate_downline(
    generation_count: i64,
    bv_per_affiliate: f64,
    first_gen_count: i64,
    other_gen_count: i64,
) -> DomainResult<Downline> {
    let generation_count = usize::try_from(generation_count).map_err(|_| {
        DomainError::invalid_parameter(
            "generation_count",
            format!("must be non-negative, got {generation_count}"),
        )
    })?;
    let first = GenerationRecord::new(first_gen_count, bv_per_affiliate)?;
    let other = GenerationRecord::new(other_gen_count, bv_per_affiliate)?;

    let generations: Vec<_> = (0..generation_count)
        .map(|i| if i == 0 { first } else { other })
        .collect();
    debug!("generated {} generations", generations.len());
    Ok(Downline(generations))
}

/// Team bonus breakdown, returned whole so it can be audited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamBonus {
    /// Smaller of the two leg volumes
    pub bv_base: f64,
    /// Tier rate applied to the base
    pub rate: f64,
    /// Payout after the optional cap
    pub amount: f64,
    /// Daily cap in effect, if any
    pub cap: Option<f64>,
}

impl TeamBonus {
    /// Payout before any cap.
    pub fn uncapped_amount(&self) -> f64 {
        self.bv_base * self.rate
    }

    pub fn is_capped(&self) -> bool {
        self.cap.is_some_and(|cap| self.uncapped_amount() > cap)
    }
}

/// Elite bonus: one amount per eligible generation plus the total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EliteBonus {
    pub generation_bonuses: Vec<f64>,
    pub total: f64,
}

impl EliteBonus {
    pub fn is_empty(&self) -> bool {
        self.generation_bonuses.is_empty()
    }
}
