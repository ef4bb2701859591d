use anyhow::Context;
use padop_core::{config::CharmConfig, facts::FactSet, io, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    io::ensure_dir(&paths::padop_dir(root)).context("failed to create state directory")?;

    let mut created = Vec::new();

    if !paths::config_path(root).exists() {
        CharmConfig::default()
            .save(root)
            .context("failed to write default config")?;
        created.push(paths::CONFIG_FILE);
    }

    if !paths::facts_path(root).exists() {
        FactSet::new()
            .save(root)
            .context("failed to write empty fact set")?;
        created.push(paths::FACTS_FILE);
    }

    if json {
        #[derive(serde::Serialize)]
        struct InitOutput<'a> {
            created: &'a [&'a str],
        }
        return crate::output::print_json(&InitOutput { created: &created });
    }

    if created.is_empty() {
        println!("Already initialized.");
    } else {
        for path in &created {
            println!("Created {path}");
        }
    }
    Ok(())
}
