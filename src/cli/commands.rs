//! Command dispatch: translate arguments into service calls and print results.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{DownlineRequest, SimulationReport, SimulationRequest, SimulationService};
use crate::cli::args::{Cli, Commands, ConfigCommands, DownlineArgs, LegArgs};
use crate::cli::output;
use crate::cli::tree::TreeRender;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::{tiers, Downline, EliteBonus, Network, TeamBonus, Tier};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = match &cli.config {
        Some(path) => Settings::load_file(path)?,
        None => Settings::load(Some(project_dir.as_path()))?,
    };
    debug!("settings: {:?}", settings);
    let service = SimulationService::new(settings);

    match &cli.command {
        Some(Commands::Tiers) => cmd_tiers(cli.json),
        Some(Commands::Team { legs, tier, cap }) => {
            cmd_team(&service, legs, tier.as_deref(), *cap, cli.json)
        }
        Some(Commands::Elite { downline, tier }) => {
            cmd_elite(&service, downline, tier.as_deref(), cli.json)
        }
        Some(Commands::Network { downline, edges }) => {
            cmd_network(&service, downline, *edges, cli.json)
        }
        Some(Commands::Simulate {
            legs,
            downline,
            tier,
            cap,
        }) => cmd_simulate(&service, legs, downline, tier.clone(), *cap, cli.json),
        Some(Commands::Config { command }) => cmd_config(&service, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn resolve_project_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().map_err(|e| CliError::io("current directory", e)),
    }
}

fn downline_request(args: &DownlineArgs) -> DownlineRequest {
    DownlineRequest {
        generations: args.generations,
        bv_per_affiliate: args.bv,
        custom: args.custom.clone(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io("serialize output", io::Error::other(e)))?;
    output::info(&text);
    Ok(())
}

#[instrument(level = "debug")]
fn cmd_tiers(json: bool) -> CliResult<()> {
    if json {
        return print_json(tiers());
    }
    output::header("Tiers");
    for tier in tiers() {
        output::detail(&format!(
            "{:<12} team {:>6}  elite depth {}",
            output::tier_name(tier),
            output::percent(tier.team_bonus_rate),
            tier.elite_depth
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_team(
    service: &SimulationService,
    legs: &LegArgs,
    tier: Option<&str>,
    cap: Option<f64>,
    json: bool,
) -> CliResult<()> {
    let bonus = service.team_bonus(legs.bv_private, legs.bv_public, tier, cap)?;
    if json {
        return print_json(&bonus);
    }
    let tier = service.tier(tier)?;
    print_team(tier, &bonus);
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_elite(
    service: &SimulationService,
    args: &DownlineArgs,
    tier: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let downline = service.downline(&downline_request(args))?;
    let bonus = service.elite_bonus(&downline, tier)?;
    if json {
        return print_json(&bonus);
    }
    let tier = service.tier(tier)?;
    print_elite(tier, &downline, &bonus);
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_network(
    service: &SimulationService,
    args: &DownlineArgs,
    edges: bool,
    json: bool,
) -> CliResult<()> {
    let downline = service.downline(&downline_request(args))?;
    let network = service.network(&downline)?;
    if json {
        return print_json(&network);
    }
    print_network(&network, edges);
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_simulate(
    service: &SimulationService,
    legs: &LegArgs,
    args: &DownlineArgs,
    tier: Option<String>,
    cap: Option<f64>,
    json: bool,
) -> CliResult<()> {
    let request = SimulationRequest {
        tier,
        bv_private: legs.bv_private,
        bv_public: legs.bv_public,
        downline: downline_request(args),
        daily_cap: cap,
    };
    let report = service.simulate(&request)?;
    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn cmd_config(
    service: &SimulationService,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&service.settings().to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                let dir = global_config_dir().ok_or_else(|| {
                    CliError::InvalidArgs("cannot determine global config directory".into())
                })?;
                std::fs::create_dir_all(&dir)
                    .map_err(|e| CliError::io(format!("create {}", dir.display()), e))?;
                dir.join("mlmsim.toml")
            } else {
                local_config_path(project_dir)
            };
            if path.exists() {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".into());
            output::info(&format!("global: {global}"));
            output::info(&format!(
                "local:  {}",
                local_config_path(project_dir).display()
            ));
        }
    }
    Ok(())
}

fn print_team(tier: &Tier, bonus: &TeamBonus) {
    output::header(&format!("Team bonus ({})", output::tier_name(tier)));
    output::metric("BV base", &output::amount(bonus.bv_base));
    output::metric("Rate", &output::percent(bonus.rate));
    if let Some(cap) = bonus.cap {
        output::metric("Daily cap", &output::amount(cap));
        if bonus.is_capped() {
            output::metric("Before cap", &output::amount(bonus.uncapped_amount()));
        }
    }
    output::metric("Amount", &output::amount(bonus.amount));
}

fn print_elite(tier: &Tier, downline: &Downline, bonus: &EliteBonus) {
    output::header(&format!(
        "Elite bonus ({}, depth {})",
        output::tier_name(tier),
        tier.elite_depth
    ));
    output::metric("Generations", &downline.len());
    output::metric("Per generation", &output::generation_bonuses(bonus));
    output::metric("Total", &output::amount(bonus.total));
}

fn print_network(network: &Network, edges: bool) {
    if edges {
        for edge in network.edges() {
            output::info(&format!("{} -> {}", edge.parent, edge.child));
        }
        return;
    }
    output::info(&network.to_tree_string());
}

fn print_report(report: &SimulationReport) {
    print_team(&report.tier, &report.team);
    print_elite(&report.tier, &report.downline, &report.elite);
    output::header(&format!(
        "Network ({} affiliates)",
        report.network.affiliate_count()
    ));
    print_network(&report.network, false);
}
