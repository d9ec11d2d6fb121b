//! dptf-facade CLI entry point.
//!
//! Drives the power and display control facades against a simulated
//! platform described by a platform.json file.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dptf_common::error::format_error_human;
use dptf_common::{
    DomainIndex, Error, ParticipantIndex, Power, PowerControlStatus, PowerControlType, Result,
    StructuredError,
};
use dptf_config::{resolve_platform, validate_platform, ConfigSnapshot, PlatformConfig};
use dptf_core::exit_codes::ExitCode;
use dptf_core::logging::{cli_level, init_logging, LogConfig, LogFormat};
use dptf_core::{DisplayControlFacade, PolicyServices, PowerControlFacade, SimulatedPlatform};
use serde_json::json;
use tracing::debug;

#[derive(Parser)]
#[command(name = "dptf-facade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Platform description file (defaults to DPTF_PLATFORM, XDG, /etc, built-in)
    #[arg(long, global = true)]
    platform: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the platform description
    Check,
    /// Show capabilities and current state of a domain
    Status(TargetArgs),
    /// Arm every control facade of a domain (or of all domains)
    Arm(ArmArgs),
    /// Arm a power domain, then submit one power limit tier
    SetPower(SetPowerArgs),
}

#[derive(Args, Debug)]
struct TargetArgs {
    #[arg(long, default_value_t = 0)]
    participant: u32,

    #[arg(long, default_value_t = 0)]
    domain: u32,
}

#[derive(Args, Debug)]
struct ArmArgs {
    /// Restrict to one participant
    #[arg(long)]
    participant: Option<u32>,

    /// Restrict to one domain index
    #[arg(long)]
    domain: Option<u32>,
}

#[derive(Args, Debug)]
struct SetPowerArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Power limit tier
    #[arg(long, default_value = "pl1")]
    slot: PowerControlType,

    /// Requested limit in watts
    #[arg(long)]
    watts: u32,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Without -v/-q or --format json, DPTF_LOG and DPTF_LOG_FORMAT decide.
    let log_format = matches!(cli.global.format, OutputFormat::Json).then_some(LogFormat::Jsonl);
    init_logging(&LogConfig::from_env(
        cli_level(cli.global.verbose, cli.global.quiet),
        log_format,
    ));

    let result = match &cli.command {
        Commands::Check => run_check(&cli.global),
        Commands::Status(args) => run_status(&cli.global, args),
        Commands::Arm(args) => run_arm(&cli.global, args),
        Commands::SetPower(args) => run_set_power(&cli.global, args),
    };

    let code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            match cli.global.format {
                OutputFormat::Json => eprintln!("{}", StructuredError::from(&err).to_json()),
                OutputFormat::Human => eprintln!("{}", format_error_human(&err, false)),
            }
            ExitCode::from(&err)
        }
    };
    code.into()
}

/// Resolve, load and validate the platform description.
fn load_platform(global: &GlobalOpts) -> Result<(PlatformConfig, ConfigSnapshot)> {
    if let Some(path) = &global.platform {
        if !path.exists() {
            return Err(Error::Config(format!(
                "platform file not found: {}",
                path.display()
            )));
        }
    }

    let resolved = resolve_platform(global.platform.as_deref());
    let (config, snapshot) = PlatformConfig::load(&resolved)?;
    validate_platform(&config)?;

    debug!(
        source = %snapshot.source,
        hash = %snapshot.content_hash,
        domains = snapshot.domain_count,
        "platform loaded"
    );
    Ok((config, snapshot))
}

/// Facades for one domain, sharing a simulated platform.
struct DomainFacades {
    power: PowerControlFacade,
    display: DisplayControlFacade,
}

fn build_facades(
    config: &PlatformConfig,
    services: &PolicyServices,
    participant: ParticipantIndex,
    domain: DomainIndex,
) -> Result<DomainFacades> {
    let domain_config = config.domain(participant, domain).ok_or_else(|| {
        Error::Config(format!(
            "participant {} domain {} not described in platform",
            participant, domain
        ))
    })?;
    let properties = domain_config.properties.clone();
    Ok(DomainFacades {
        power: PowerControlFacade::new(participant, domain, properties.clone(), services.clone()),
        display: DisplayControlFacade::new(participant, domain, properties, services.clone()),
    })
}

fn run_check(global: &GlobalOpts) -> Result<()> {
    let (config, snapshot) = load_platform(global)?;
    match global.format {
        OutputFormat::Json => print_json(&json!({
            "valid": true,
            "snapshot": snapshot,
        }))?,
        OutputFormat::Human => {
            println!("Platform OK ({})", snapshot.source);
            if let Some(path) = &snapshot.path {
                println!("  path: {}", path);
            }
            println!("  sha256: {}", snapshot.content_hash);
            for (participant, domain) in config.domains() {
                println!(
                    "  participant {} domain {} ({}): power={} display={}",
                    participant,
                    domain.index,
                    domain.properties.name,
                    domain.properties.implements_power_control,
                    domain.properties.implements_display_control
                );
            }
        }
    }
    Ok(())
}

fn run_status(global: &GlobalOpts, args: &TargetArgs) -> Result<()> {
    let (config, _) = load_platform(global)?;
    let platform = Arc::new(SimulatedPlatform::from_config(&config));
    let services = PolicyServices::from_platform(platform);
    let (participant, domain) = (ParticipantIndex(args.participant), DomainIndex(args.domain));
    let mut facades = build_facades(&config, &services, participant, domain)?;

    let mut report = json!({
        "participant": participant,
        "domain": domain,
    });
    if facades.power.supports_power_controls() {
        report["power"] = json!({
            "current": facades.power.get_current_power()?,
            "capabilities": facades.power.get_capabilities()?.clone(),
            "controls": facades.power.get_controls()?.as_slice(),
        });
    }
    if facades.display.supports_display_controls() {
        report["display"] = json!({
            "levels": facades.display.get_capabilities()?.clone(),
            "status": facades.display.get_status()?,
        });
    }

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => {
            println!("participant {} domain {}", participant, domain);
            if facades.power.supports_power_controls() {
                println!("  current power: {}", facades.power.get_current_power()?.current_power);
                let caps = facades.power.get_capabilities()?.clone();
                for entry in &caps {
                    println!(
                        "  {}: {}..{} (window <= {})",
                        entry.power_control_type,
                        entry.min_power_limit,
                        entry.max_power_limit,
                        entry.max_time_window
                    );
                }
                for status in facades.power.get_controls()?.iter() {
                    println!("  programmed {}", status);
                }
            }
            if facades.display.supports_display_controls() {
                let levels = facades.display.get_capabilities()?.len();
                let status = facades.display.get_status()?;
                println!(
                    "  brightness index {} of {} levels",
                    status.brightness_limit_index, levels
                );
            }
        }
    }
    Ok(())
}

fn run_arm(global: &GlobalOpts, args: &ArmArgs) -> Result<()> {
    let (config, _) = load_platform(global)?;
    let platform = Arc::new(SimulatedPlatform::from_config(&config));
    let services = PolicyServices::from_platform(platform.clone());

    let targets: Vec<(ParticipantIndex, DomainIndex)> = config
        .domains()
        .map(|(participant, domain)| (participant, domain.index))
        .filter(|(participant, domain)| {
            args.participant.map_or(true, |p| participant.0 == p)
                && args.domain.map_or(true, |d| domain.0 == d)
        })
        .collect();
    if targets.is_empty() {
        return Err(Error::Config(
            "no domain matches the requested participant/domain".to_string(),
        ));
    }

    let mut armed = Vec::new();
    for (participant, domain) in targets {
        let mut facades = build_facades(&config, &services, participant, domain)?;
        facades.power.ensure_initialized()?;
        facades.display.ensure_initialized()?;

        armed.push(json!({
            "participant": participant,
            "domain": domain,
            "power_writes": platform.power_writes(participant, domain),
            "power_last_issued": facades.power.get_last_issued(),
            "display_writes": platform.display_writes(participant, domain),
            "display_last_issued": facades.display.get_last_issued(),
        }));
    }

    match global.format {
        OutputFormat::Json => print_json(&json!({ "armed": armed }))?,
        OutputFormat::Human => {
            for entry in &armed {
                println!(
                    "participant {} domain {}: {} power write(s), {} display write(s)",
                    entry["participant"],
                    entry["domain"],
                    entry["power_writes"].as_array().map_or(0, Vec::len),
                    entry["display_writes"].as_array().map_or(0, Vec::len)
                );
            }
        }
    }
    Ok(())
}

fn run_set_power(global: &GlobalOpts, args: &SetPowerArgs) -> Result<()> {
    let (config, _) = load_platform(global)?;
    let platform = Arc::new(SimulatedPlatform::from_config(&config));
    let services = PolicyServices::from_platform(platform.clone());
    let (participant, domain) = (
        ParticipantIndex(args.target.participant),
        DomainIndex(args.target.domain),
    );
    let mut facades = build_facades(&config, &services, participant, domain)?;
    let facade = &mut facades.power;

    facade.ensure_initialized()?;
    let index = facade.get_pl_index(args.slot)?;
    let caps = *facade.get_capabilities()?.get(index)?;
    let limit = Power::checked_from_watts(args.watts)
        .ok_or_else(|| Error::Config(format!("--watts {} is out of range", args.watts)))?;
    let status = PowerControlStatus::new(
        args.slot,
        limit,
        caps.max_time_window,
        caps.max_duty_cycle,
    );
    facade.set_control(status, index)?;

    let submitted = platform
        .power_writes(participant, domain)
        .pop()
        .unwrap_or_default();
    match global.format {
        OutputFormat::Json => print_json(&json!({
            "participant": participant,
            "domain": domain,
            "index": index,
            "submitted": submitted,
            "last_issued": facade.get_last_issued(),
        }))?,
        OutputFormat::Human => {
            println!("submitted to participant {} domain {}:", participant, domain);
            for (position, entry) in submitted.iter().enumerate() {
                let marker = if position == index { "*" } else { " " };
                println!("  {} {}", marker, entry);
            }
        }
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
