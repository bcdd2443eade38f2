use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use dvroute::framework::{ReconvergencePolicy, RoutingSystem, SimParams};
use dvroute::util::Metric;
use log::info;
use simplelog::*;

use crate::sim::{OutputFormat, Options};

mod graph_parse;
mod render;
mod sim;

/// Routers are named by the tokens of the topology description
pub struct SimSystem;

impl RoutingSystem for SimSystem {
    type NodeAddress = String;
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// keep the table and replay the last vectors for one round
    Incremental,
    /// rebuild the table from the new topology
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "dvroute-sim", version, about = "Distance vector routing convergence simulator")]
struct Cli {
    /// Topology description, stdin when omitted or `-`
    input: Option<PathBuf>,

    /// JSON file with simulation parameters, flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Rounds a phase may run before giving up [default: 131072]
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Path metrics at or above this value count as unreachable [default: 65535].
    /// A partition counts up to it one round at a time, so a small value such as 16
    /// keeps link failures short
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    infinity: Option<Metric>,

    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Only print routing tables
    #[arg(long)]
    routes_only: bool,

    /// More logging on stderr, repeatable
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// No logging at all
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn params(&self) -> anyhow::Result<SimParams> {
        let mut params = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("unable to read config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => SimSystem::config(),
        };
        if let Some(policy) = self.policy {
            params.policy = match policy {
                PolicyArg::Incremental => ReconvergencePolicy::Incremental,
                PolicyArg::Reset => ReconvergencePolicy::Reset,
            };
        }
        if let Some(max_rounds) = self.max_rounds {
            params.max_rounds = max_rounds;
        }
        if let Some(infinity) = self.infinity {
            params.infinity = infinity;
        }
        Ok(params)
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
                .with_context(|| format!("unable to read {}", path.display())),
            _ => {
                let mut input = String::new();
                io::stdin()
                    .read_to_string(&mut input)
                    .context("unable to read stdin")?;
                Ok(input)
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    CombinedLogger::init(vec![TermLogger::new(
        cli.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])?;

    let params = cli.params()?;
    info!("parameters: {params:?}");

    let scenario = graph_parse::parse(&cli.read_input()?)?;
    let opts = Options {
        format: match cli.format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        },
        routes_only: cli.routes_only,
    };

    let stdout = io::stdout();
    sim::run(&scenario, params, opts, &mut stdout.lock())
}
