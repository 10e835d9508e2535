//! Simulation service
//!
//! Resolves tier names and configured defaults, then runs the engine over a
//! single downline so that bonuses and network always share one topology.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    build_network, compute_elite_bonus, compute_team_bonus, compute_team_bonus_capped,
    generate_downline, lookup_tier, Downline, DomainError, EliteBonus, GenerationRecord, Network,
    TeamBonus, Tier,
};

/// How to obtain the downline: explicit generations, or the generator.
#[derive(Debug, Clone, Default)]
pub struct DownlineRequest {
    /// Generation count; falls back to `Settings::generations`
    pub generations: Option<i64>,
    /// Constant BV per affiliate; falls back to `Settings::bv_per_affiliate`
    pub bv_per_affiliate: Option<f64>,
    /// Explicit per-generation figures, replacing the generator when non-empty
    pub custom: Vec<GenerationRecord>,
}

/// Inputs for a full simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationRequest {
    /// Tier name; falls back to `Settings::default_tier`
    pub tier: Option<String>,
    pub bv_private: f64,
    pub bv_public: f64,
    pub downline: DownlineRequest,
    /// Overrides `Settings::daily_cap`
    pub daily_cap: Option<f64>,
}

/// Everything computed for one request.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub tier: Tier,
    pub team: TeamBonus,
    pub elite: EliteBonus,
    pub downline: Downline,
    pub network: Network,
}

/// Service running compensation simulations with configured defaults.
pub struct SimulationService {
    settings: Arc<Settings>,
}

impl SimulationService {
    pub fn new(settings: Settings) -> Self {
        Self::with_settings(Arc::new(settings))
    }

    pub fn with_settings(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve a tier, defaulting to the configured one.
    pub fn tier(&self, name: Option<&str>) -> ApplicationResult<&'static Tier> {
        let name = name.unwrap_or(&self.settings.default_tier);
        Ok(lookup_tier(name)?)
    }

    /// Produce the downline for a request, enforcing the generation bound.
    #[instrument(level = "debug", skip(self))]
    pub fn downline(&self, request: &DownlineRequest) -> ApplicationResult<Downline> {
        if !request.custom.is_empty() {
            if let Some(bv) = request.bv_per_affiliate {
                return Err(DomainError::invalid_parameter(
                    "bv_per_affiliate",
                    format!("{bv} given together with custom generations that carry their own BV"),
                )
                .into());
            }
            if let Some(n) = request.generations {
                if usize::try_from(n).ok() != Some(request.custom.len()) {
                    return Err(DomainError::invalid_parameter(
                        "generations",
                        format!(
                            "{n} requested but {} custom generations given",
                            request.custom.len()
                        ),
                    )
                    .into());
                }
            }
            self.ensure_within_bound(request.custom.len() as i64)?;
            debug!("using {} custom generations", request.custom.len());
            return Ok(Downline::new(request.custom.clone()));
        }

        let generations = request
            .generations
            .unwrap_or(i64::from(self.settings.generations));
        self.ensure_within_bound(generations)?;
        let bv = request
            .bv_per_affiliate
            .unwrap_or(self.settings.bv_per_affiliate);
        Ok(generate_downline(
            generations,
            bv,
            i64::from(self.settings.first_gen_count),
            i64::from(self.settings.other_gen_count),
        )?)
    }

    /// Team bonus by tier name. `daily_cap` overrides the configured cap.
    #[instrument(level = "debug", skip(self))]
    pub fn team_bonus(
        &self,
        bv_private: f64,
        bv_public: f64,
        tier: Option<&str>,
        daily_cap: Option<f64>,
    ) -> ApplicationResult<TeamBonus> {
        let tier = self.tier(tier)?;
        let bonus = match daily_cap.or(self.settings.daily_cap) {
            Some(cap) => compute_team_bonus_capped(bv_private, bv_public, tier, cap)?,
            None => compute_team_bonus(bv_private, bv_public, tier)?,
        };
        Ok(bonus)
    }

    /// Elite bonus by tier name.
    pub fn elite_bonus(&self, downline: &Downline, tier: Option<&str>) -> ApplicationResult<EliteBonus> {
        let tier = self.tier(tier)?;
        Ok(compute_elite_bonus(downline, tier)?)
    }

    pub fn network(&self, downline: &Downline) -> ApplicationResult<Network> {
        Ok(build_network(downline)?)
    }

    /// Run every calculator over one downline.
    #[instrument(level = "debug", skip(self, request), fields(tier = ?request.tier))]
    pub fn simulate(&self, request: &SimulationRequest) -> ApplicationResult<SimulationReport> {
        let tier = self.tier(request.tier.as_deref())?;
        let downline = self.downline(&request.downline)?;
        let team = self.team_bonus(
            request.bv_private,
            request.bv_public,
            Some(tier.name),
            request.daily_cap,
        )?;
        let elite = compute_elite_bonus(&downline, tier)?;
        let network = build_network(&downline)?;
        debug!(
            "simulation: team={} elite={} nodes={}",
            team.amount,
            elite.total,
            network.len()
        );

        Ok(SimulationReport {
            tier: *tier,
            team,
            elite,
            downline,
            network,
        })
    }

    fn ensure_within_bound(&self, generations: i64) -> ApplicationResult<()> {
        let max = i64::from(self.settings.max_generations);
        if generations > max {
            return Err(DomainError::invalid_parameter(
                "generations",
                format!("at most {max} generations are supported, got {generations}"),
            )
            .into());
        }
        Ok(())
    }
}
