use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::config::{CliOverrides, FolioConfig};
use folio::portfolio::models::MediaType;

mod cmd;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Admin client for a portfolio site's project list")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API base URL. Overrides FOLIO_API_URL and folio.toml.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the login session is kept. Overrides FOLIO_SESSION_FILE and folio.toml.
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Path to folio.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with the admin password
    Login {
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Check whether the stored session is still accepted
    Status,
    /// List projects in display order
    List {
        /// Print the projects as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one project
    Show { id: String },
    /// Create a project
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Image or video URL
        #[arg(long)]
        image: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long, default_value = "image")]
        media_type: MediaType,
    },
    /// Edit a project; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
        /// Project link; pass an empty string to remove it
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        media_type: Option<MediaType>,
    },
    /// Delete a project after confirmation
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move a project onto another project's position
    Move {
        /// Project to move
        id: String,
        /// Project whose position it takes
        over: String,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default folio.toml
    Init,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "folio=debug" } else { "folio=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = FolioConfig::load(CliOverrides {
        config: cli.config.clone(),
        api_url: cli.api_url.clone(),
        session_file: cli.session_file.clone(),
        verbose: cli.verbose,
    })?;
    tracing::debug!(
        config = %config.config_path.display(),
        api_url = %config.api_url(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Login { password } => cmd::cmd_login(&config, password).await?,
        Commands::Logout => cmd::cmd_logout(&config)?,
        Commands::Status => cmd::cmd_status(&config).await?,
        Commands::List { json } => cmd::cmd_list(&config, json).await?,
        Commands::Show { id } => cmd::cmd_show(&config, &id).await?,
        Commands::Add {
            title,
            description,
            image,
            tags,
            link,
            media_type,
        } => {
            let fields = cmd::ProjectFields {
                title: Some(title),
                description: Some(description),
                image: Some(image),
                tags,
                link,
                media_type: Some(media_type),
            };
            cmd::cmd_add(&config, fields).await?
        }
        Commands::Edit {
            id,
            title,
            description,
            image,
            tags,
            link,
            media_type,
        } => {
            let fields = cmd::ProjectFields {
                title,
                description,
                image,
                tags,
                link,
                media_type,
            };
            cmd::cmd_edit(&config, &id, fields).await?
        }
        Commands::Delete { id, yes } => cmd::cmd_delete(&config, &id, yes).await?,
        Commands::Move { id, over } => cmd::cmd_move(&config, &id, &over).await?,
        Commands::Config { command } => cmd::cmd_config(&config, command)?,
    }

    Ok(())
}
