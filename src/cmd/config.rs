//! Configuration view and validation commands: `folio config`.

use anyhow::{Context, Result};

use folio::config::{FolioConfig, FolioToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &FolioConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &config.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Folio Configuration");
            println!("===================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No folio.toml found at {}", config_path.display());
                println!("Using defaults. Run 'folio config init' to create one.");
            }
            println!();

            println!("Effective values (with env/CLI overrides):");
            let effective = toml::to_string_pretty(&config.effective())
                .context("Failed to render configuration")?;
            for line in effective.lines() {
                println!("  {}", line);
            }
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("folio.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            FolioToml::default().save(config_path)?;

            println!("Created folio.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, timeout_secs");
            println!("  - [session] file");
            println!();
        }
    }

    Ok(())
}
