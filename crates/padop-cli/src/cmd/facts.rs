use crate::output::print_json;
use anyhow::Context;
use padop_core::{facts::FactSet, types::Flag};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let facts = FactSet::load(root).context("failed to load fact set")?;

    if json {
        return print_json(&facts);
    }

    for flag in Flag::all() {
        println!("{flag}: {}", facts.is_set(*flag));
    }

    println!();
    println!(
        "db credentials: {}",
        if facts.db.is_some() { "cached" } else { "none" }
    );
    match facts.open_port {
        Some(port) => println!("open port: {port}"),
        None => println!("open port: none"),
    }
    if let Some(entry) = facts.last_action() {
        println!(
            "last action: {} on {} ({})",
            entry.action, entry.event, entry.outcome
        );
    }
    Ok(())
}
