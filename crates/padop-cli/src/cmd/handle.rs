use crate::output::{print_json, print_pairs};
use anyhow::Context;
use padop_core::{
    config::CharmConfig,
    facts::FactSet,
    reconciler::{HostProbe, Reconciler},
    relations::RelationPayloads,
    types::Event,
};
use std::path::Path;
use std::str::FromStr;

pub fn run(
    root: &Path,
    event: &str,
    payload: Option<&Path>,
    leader: bool,
    service_running: bool,
    json: bool,
) -> anyhow::Result<()> {
    let event = Event::from_str(event)?;
    let facts = FactSet::load(root).context("failed to load fact set")?;
    let config = CharmConfig::load(root).context("failed to load config")?;

    let payloads = match payload {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read payload file {}", path.display()))?;
            serde_json::from_str::<RelationPayloads>(&data).context("invalid payload JSON")?
        }
        None => RelationPayloads::default(),
    };

    let host = HostProbe {
        leader,
        service_running,
    };

    let out = Reconciler::default().reconcile(event, facts, &config, &payloads, host);

    // Persist the grown fact set before the runtime executes anything;
    // effects stay idempotent in case we crash between the two.
    out.facts.save(root).context("failed to persist fact set")?;

    if json {
        return print_json(&out);
    }

    println!("Event: {event}");
    if out.executed.is_empty() {
        println!("No actions ran.");
    } else {
        println!("Executed: {}", out.executed.join(", "));
    }
    for d in &out.deferred {
        println!("Deferred: {} ({})", d.action, d.reason);
    }
    if !out.effects.is_empty() {
        println!("\nEffects:");
        let rows: Vec<(String, String)> = out
            .effects
            .iter()
            .enumerate()
            .map(|(i, e)| (format!("{}.", i + 1), e.describe()))
            .collect();
        print_pairs(&rows);
    }
    if let Some((level, message)) = out.final_status() {
        println!("\nStatus: {level}: {message}");
    }
    Ok(())
}
