use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Subcommand;
use padop_core::config::{CharmConfig, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Check the configuration for problems
    Validate,
}

pub fn run(root: &Path, subcommand: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = CharmConfig::load(root).context("failed to load config")?;

    match subcommand {
        ConfigSubcommand::Show => {
            if json {
                return print_json(&config);
            }
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        ConfigSubcommand::Validate => {
            let warnings = config.validate();
            let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
            if json {
                print_json(&warnings)?;
                if has_errors {
                    bail!("configuration has errors");
                }
                return Ok(());
            }
            if warnings.is_empty() {
                println!("Configuration OK.");
                return Ok(());
            }
            for w in &warnings {
                println!(
                    "{}: {}",
                    match w.level {
                        WarnLevel::Warning => "warning",
                        WarnLevel::Error => "error",
                    },
                    w.message
                );
            }
            if has_errors {
                bail!("configuration has errors");
            }
            Ok(())
        }
    }
}
