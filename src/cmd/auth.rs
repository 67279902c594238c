//! Session commands: `folio login`, `folio logout` and `folio status`.

use anyhow::{Context, Result};
use console::style;

use folio::config::FolioConfig;
use folio::portfolio::guard::GuardState;
use folio::portfolio::session::{FileStore, SessionStore};
use folio::ui::icons::{CHECK, CROSS, LOCK};
use folio::ui::RequestSpinner;

use super::Session;

pub async fn cmd_login(config: &FolioConfig, password: Option<String>) -> Result<()> {
    use dialoguer::Password;

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Admin password")
            .interact()
            .context("Failed to read password")?,
    };

    let mut session = Session::open(config)?;
    let spinner = RequestSpinner::start("Logging in...", false);
    let response = session.manager.login(&session.api, &password).await;

    if response.success {
        spinner.success(&response.message);
        println!(
            "Session saved to {}",
            style(config.session_file().display()).dim()
        );
        Ok(())
    } else {
        spinner.fail(&response.message);
        anyhow::bail!("{}", response.message)
    }
}

pub fn cmd_logout(config: &FolioConfig) -> Result<()> {
    let mut session = Session::open(config)?;
    let had_session = session.api.store().token().is_some();
    session.manager.logout(&session.api);

    if had_session {
        println!("{}Logged out", CHECK);
    } else {
        println!("No active session");
    }
    Ok(())
}

pub async fn cmd_status(config: &FolioConfig) -> Result<()> {
    let store = FileStore::new(config.session_file());
    let saved_at = store.saved_at();

    let mut session = Session::open(config)?;
    let spinner = RequestSpinner::start("Verifying session...", false);
    let state = session.manager.enter_dashboard(session.api.as_ref()).await;
    spinner.clear();

    println!();
    println!("API:     {}", session.api.base_url());
    println!("Session: {}", config.session_file().display());
    match state {
        GuardState::Authenticated => {
            println!("{}{}", LOCK, style("Authenticated").green().bold());
            if let Some(at) = saved_at {
                println!("  since {}", style(at.format("%Y-%m-%d %H:%M UTC")).dim());
            }
        }
        other => {
            println!("{}{}", CROSS, style(other.as_str()).yellow());
            println!("Run 'folio login' to sign in.");
        }
    }
    println!();
    Ok(())
}
