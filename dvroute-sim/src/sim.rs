use std::io::Write;

use anyhow::Context;
use dvroute::engine::Network;
use dvroute::framework::SimParams;
use log::info;

use crate::graph_parse::Scenario;
use crate::render::{self, PhaseReport};
use crate::SimSystem;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub format: OutputFormat,
    /// skip the per-round distance tables
    pub routes_only: bool,
}

/// Runs the initial phase and one phase per update batch, writing the tables to `out`
pub fn run(scenario: &Scenario, params: SimParams, opts: Options, out: &mut impl Write) -> anyhow::Result<()> {
    let mut network = Network::<SimSystem>::with_params(scenario.nodes.iter().cloned(), &scenario.links, params)
        .context("invalid initial topology")?;
    info!(
        "simulating {} routers, {} links, {} update batches",
        scenario.nodes.len(),
        scenario.links.len(),
        scenario.updates.len()
    );

    let show_rounds = opts.format == OutputFormat::Text && !opts.routes_only;
    let mut reports = Vec::new();

    for phase in 0..=scenario.updates.len() {
        if phase > 0 {
            network
                .apply_updates(&scenario.updates[phase - 1])
                .with_context(|| format!("invalid update batch {phase}"))?;
        }

        let mut text = String::new();
        if show_rounds {
            text.push_str(&render::distance_tables(&network));
        }
        let convergence = network
            .converge_with(|net, _| {
                if show_rounds {
                    text.push_str(&render::distance_tables(net));
                }
            })
            .with_context(|| format!("phase {phase}"))?;

        match opts.format {
            OutputFormat::Text => {
                text.push_str(&render::routing_tables(&network.routing_tables()));
                out.write_all(text.as_bytes())?;
            }
            OutputFormat::Json => {
                reports.push(PhaseReport::new(phase, convergence, network.routing_tables()));
            }
        }
    }

    if opts.format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
