use crate::output::print_json;
use anyhow::Context;
use padop_core::{
    facts::FactSet,
    types::{Flag, StatusLevel},
};
use std::path::Path;

/// Derive the status an operator would see from the facts alone, without
/// delivering an event. Mirrors the progression of the action chain.
fn derive(facts: &FactSet) -> (StatusLevel, String) {
    if facts.is_set(Flag::WebConfigured) {
        return (StatusLevel::Active, "etherpad available".to_string());
    }
    if facts.is_set(Flag::Initialized) {
        return (
            StatusLevel::Waiting,
            "initialized; waiting for web server and TLS".to_string(),
        );
    }
    if facts.is_set(Flag::DbRequested) && !facts.is_set(Flag::DbAvailable) {
        return (
            StatusLevel::Waiting,
            "waiting for database credentials".to_string(),
        );
    }
    if facts.is_set(Flag::SystemdInstalled) {
        return (
            StatusLevel::Waiting,
            "service unit installed; waiting for database relation".to_string(),
        );
    }
    (StatusLevel::Maintenance, "installing".to_string())
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let facts = FactSet::load(root).context("failed to load fact set")?;
    let (level, message) = derive(&facts);

    if json {
        #[derive(serde::Serialize)]
        struct StatusOutput<'a> {
            level: StatusLevel,
            message: &'a str,
        }
        return print_json(&StatusOutput {
            level,
            message: &message,
        });
    }

    println!("{level}: {message}");
    Ok(())
}
