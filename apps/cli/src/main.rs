#![deny(warnings)]

//! Headless CLI: runs the world economy for a number of simulated days,
//! validates invariants, and prints a KPI summary (or a JSON snapshot).

use anyhow::{bail, Context, Result};
use sim_core::SimConfig;
use sim_runtime::Simulation;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Host frame length fed to `Simulation::tick`.
const FRAME_MS: f64 = 16.0;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    ", ",
    env!("GIT_COMMIT_DATE"),
    ")"
);

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    country: Option<String>,
    days: Option<f64>,
    seed: Option<u64>,
    speed: Option<f64>,
    rate_override: Option<f64>,
    fiscal: Option<f64>,
    tariff: Option<f64>,
    json: bool,
    history: bool,
    version: bool,
}

fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Result<T> {
    let raw = raw.with_context(|| format!("{flag} expects a value"))?;
    raw.parse().map_err(|_| anyhow::anyhow!("invalid value for {flag}: {raw}"))
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next(),
            "--country" => args.country = it.next(),
            "--days" => args.days = Some(value(&arg, it.next())?),
            "--seed" => args.seed = Some(value(&arg, it.next())?),
            "--speed" => args.speed = Some(value(&arg, it.next())?),
            "--rate-override" => args.rate_override = Some(value(&arg, it.next())?),
            "--fiscal" => args.fiscal = Some(value(&arg, it.next())?),
            "--tariff" => args.tariff = Some(value(&arg, it.next())?),
            "--json" => args.json = true,
            "--history" => args.history = true,
            "--version" => args.version = true,
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let cfg: SimConfig = serde_yaml::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!("cli {VERSION}");
        return Ok(());
    }
    info!(version = VERSION, ?args, "starting CLI");

    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    let days = args.days.unwrap_or(30.0);
    if !days.is_finite() || days < 0.0 {
        bail!("--days must be a non-negative number, got {days}");
    }

    let mut sim = Simulation::new(cfg)?;
    if let Some(name) = args.country.as_deref() {
        sim.select_player_country(name)?;
    }
    if let Some(v) = args.rate_override {
        sim.set_rate_override(v)?;
    }
    if let Some(v) = args.fiscal {
        sim.set_fiscal_balance(v)?;
    }
    if let Some(v) = args.tariff {
        sim.set_tariff_level(v)?;
    }
    if let Some(v) = args.speed {
        sim.set_speed(v)?;
    }
    if days > 0.0 && sim.speed() == 0.0 {
        bail!("cannot advance {days} days at zero speed");
    }

    sim.start();
    let mut steps: u64 = 0;
    while sim.is_running() && sim.time() < days {
        steps += u64::from(sim.tick(FRAME_MS));
        sim.check_invariants()?;
    }
    sim.pause();
    info!(steps, time = sim.time(), "run finished");

    if args.json {
        let snapshot = if args.history {
            sim.snapshot_with_history()
        } else {
            sim.snapshot()
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "World OK | day: {:.2} | oil: {:.2} | risk: {:.3} | world rate: {:.2}%",
        sim.time(),
        sim.global().oil_price,
        sim.global().risk_aversion,
        sim.global().world_rate
    );
    for (country, s) in sim.countries() {
        println!(
            concat!(
                "KPI | {:<13} | growth: {:>6.2}% | infl: {:>6.2}% | rate: {:>5.2}%",
                " | fx: {:>9.3} | debt: {:>6.1}% | equity: {:>7.2}"
            ),
            country.name(),
            s.growth,
            s.inflation,
            s.rate,
            s.fx,
            s.debt,
            s.equity
        );
    }
    if let Some(player) = sim.player() {
        println!(
            "Player | {} | reputation: {:.2} | phase: {:?}",
            player,
            sim.reputation(),
            sim.phase()
        );
    }
    if let Some(outcome) = sim.take_outcome() {
        let verdict = if outcome.won { "WON" } else { "LOST" };
        println!("Outcome | {verdict} | {}", outcome.reason);
    }
    for event in sim.events() {
        println!("Event | day {:.2} | {}", event.time, event.text);
    }

    Ok(())
}
