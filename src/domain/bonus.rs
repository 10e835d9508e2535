//! Team and elite bonus formulas.

use tracing::{debug, instrument};

use crate::domain::entities::{Downline, EliteBonus, TeamBonus};
use crate::domain::error::{ensure_volume, DomainResult};
use crate::domain::tier::Tier;

/// Rate paid on every eligible generation's volume.
pub const GENERATION_RATE: f64 = 0.04;

/// Team bonus over the weaker of the two legs.
#[instrument(level = "debug", skip(tier), fields(tier = tier.name))]
pub fn compute_team_bonus(bv_private: f64, bv_public: f64, tier: &Tier) -> DomainResult<TeamBonus> {
    let bv_private = ensure_volume("bv_private", bv_private)?;
    let bv_public = ensure_volume("bv_public", bv_public)?;

    let bv_base = bv_private.min(bv_public);
    let rate = tier.team_bonus_rate;
    let amount = bv_base * rate;
    debug!("team bonus: base={bv_base} rate={rate} amount={amount}");

    Ok(TeamBonus {
        bv_base,
        rate,
        amount,
        cap: None,
    })
}

/// Team bonus with a daily payout ceiling: `amount = min(bv_base * rate, cap)`.
pub fn compute_team_bonus_capped(
    bv_private: f64,
    bv_public: f64,
    tier: &Tier,
    daily_cap: f64,
) -> DomainResult<TeamBonus> {
    let cap = ensure_volume("daily_cap", daily_cap)?;
    let bonus = compute_team_bonus(bv_private, bv_public, tier)?;
    Ok(TeamBonus {
        amount: bonus.amount.min(cap),
        cap: Some(cap),
        ..bonus
    })
}

/// Elite bonus over the first `tier.elite_depth` generations.
///
/// Generations past the depth are left out of the result, not zeroed.
/// Only the eligible generations are validated.
#[instrument(level = "debug", skip(downline, tier), fields(tier = tier.name, generations = downline.len()))]
pub fn compute_elite_bonus(downline: &Downline, tier: &Tier) -> DomainResult<EliteBonus> {
    let mut generation_bonuses = Vec::with_capacity(tier.elite_depth.min(downline.len()));
    for record in downline.iter().take(tier.elite_depth) {
        record.validate()?;
        generation_bonuses.push(record.volume() * GENERATION_RATE);
    }
    let total = generation_bonuses.iter().fold(0.0, |acc, b| acc + b);
    debug!(
        "elite bonus: {} generations, total={total}",
        generation_bonuses.len()
    );

    Ok(EliteBonus {
        generation_bonuses,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GenerationRecord;
    use crate::domain::error::DomainError;
    use crate::domain::tier::lookup_tier;

    #[test]
    fn given_master_when_team_bonus_then_pays_ten_percent_of_weaker_leg() {
        let master = lookup_tier("Master").unwrap();
        let bonus = compute_team_bonus(3000.0, 2500.0, master).unwrap();
        assert_eq!(bonus.bv_base, 2500.0);
        assert_eq!(bonus.rate, 0.10);
        assert_eq!(bonus.amount, 250.0);
        assert_eq!(bonus.cap, None);
    }

    #[test]
    fn given_cap_when_team_bonus_then_amount_limited() {
        let master = lookup_tier("Master").unwrap();
        let bonus = compute_team_bonus_capped(3000.0, 2500.0, master, 100.0).unwrap();
        assert_eq!(bonus.amount, 100.0);
        assert_eq!(bonus.cap, Some(100.0));
        assert!(bonus.is_capped());
    }

    #[test]
    fn given_negative_cap_when_team_bonus_then_invalid_parameter() {
        let master = lookup_tier("Master").unwrap();
        assert!(matches!(
            compute_team_bonus_capped(1.0, 1.0, master, -5.0),
            Err(DomainError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn given_depth_zero_when_elite_then_invalid_records_are_ignored() {
        let junior = lookup_tier("Junior").unwrap();
        let downline = Downline::new(vec![GenerationRecord {
            affiliate_count: 4,
            bv_per_affiliate: -10.0,
        }]);
        let bonus = compute_elite_bonus(&downline, junior).unwrap();
        assert!(bonus.is_empty());
        assert_eq!(bonus.total, 0.0);
    }

    #[test]
    fn given_negative_bv_in_eligible_generation_when_elite_then_invalid_parameter() {
        let senior = lookup_tier("Senior").unwrap();
        let downline = Downline::new(vec![GenerationRecord {
            affiliate_count: 4,
            bv_per_affiliate: -10.0,
        }]);
        assert!(matches!(
            compute_elite_bonus(&downline, senior),
            Err(DomainError::InvalidParameter { .. })
        ));
    }
}
