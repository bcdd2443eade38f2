use anyhow::{bail, ensure, Context};
use dvroute::concepts::link::LinkUpdate;
use log::warn;

use crate::SimSystem;

const START: &str = "START";
const UPDATE: &str = "UPDATE";
const END: &str = "END";

/// A parsed topology description
#[derive(Debug, Default, PartialEq)]
pub struct Scenario {
    /// declaration order, the engine sorts them
    pub nodes: Vec<String>,
    pub links: Vec<LinkUpdate<SimSystem>>,
    /// one batch per UPDATE section, empty sections are dropped
    pub updates: Vec<Vec<LinkUpdate<SimSystem>>>,
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Section {
    Nodes,
    Links,
    Updates,
    Done,
}

/// Parses
/// ```text
/// X
/// Y
/// START
/// X Y 2
/// UPDATE
/// X Y -1
/// END
/// ```
pub fn parse(input: &str) -> anyhow::Result<Scenario> {
    let mut scenario = Scenario::default();
    let mut section = Section::Nodes;

    for (line_no, line) in input.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        if line.is_empty() {
            continue;
        }
        match (line, section) {
            (_, Section::Done) => bail!("line {line_no}: unexpected content after {END}"),
            (START, Section::Nodes) => section = Section::Links,
            (START, _) => bail!("line {line_no}: duplicate {START}"),
            (UPDATE, Section::Links | Section::Updates) => {
                section = Section::Updates;
                scenario.updates.push(Vec::new());
            }
            (END, Section::Links | Section::Updates) => section = Section::Done,
            (UPDATE | END, _) => bail!("line {line_no}: {line} before {START}"),
            (_, Section::Nodes) => {
                let mut tokens = line.split_whitespace();
                let name = tokens.next().unwrap_or_default();
                ensure!(
                    tokens.next().is_none(),
                    "line {line_no}: expected a single node name, got `{line}`"
                );
                if scenario.nodes.iter().any(|n| n == name) {
                    warn!("line {line_no}: node {name} declared twice");
                } else {
                    scenario.nodes.push(name.to_string());
                }
            }
            (_, Section::Links) => scenario.links.push(parse_link(line, line_no)?),
            (_, Section::Updates) => {
                let link = parse_link(line, line_no)?;
                if let Some(batch) = scenario.updates.last_mut() {
                    batch.push(link);
                }
            }
        }
    }

    ensure!(section != Section::Nodes, "missing {START} marker");
    scenario.updates.retain(|batch| !batch.is_empty());
    Ok(scenario)
}

fn parse_link(line: &str, line_no: usize) -> anyhow::Result<LinkUpdate<SimSystem>> {
    let parts = line.split_whitespace().collect::<Vec<&str>>();
    ensure!(
        parts.len() == 3,
        "line {line_no}: expected `<node> <node> <cost>`, got `{line}`"
    );
    let wire: i64 = parts[2]
        .parse()
        .with_context(|| format!("line {line_no}: cost `{}` is not an integer", parts[2]))?;
    LinkUpdate::from_wire(parts[0].to_string(), parts[1].to_string(), wire)
        .with_context(|| format!("line {line_no}"))
}
