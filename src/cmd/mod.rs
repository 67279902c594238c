//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                                 |
//! |------------|--------------------------------------------------|
//! | `auth`     | `Login`, `Logout`, `Status`                      |
//! | `projects` | `List`, `Show`, `Add`, `Edit`, `Delete`, `Move`  |
//! | `config`   | `Config`                                         |

pub mod auth;
pub mod config;
pub mod projects;

pub use auth::{cmd_login, cmd_logout, cmd_status};
pub use config::cmd_config;
pub use projects::{
    ProjectFields, cmd_add, cmd_delete, cmd_edit, cmd_list, cmd_move, cmd_show,
};

use anyhow::Result;
use std::sync::Arc;

use folio::config::FolioConfig;
use folio::portfolio::api::ApiClient;
use folio::portfolio::guard::GuardState;
use folio::portfolio::session::{FileStore, Route, SessionManager};

/// Client plus the navigation state that observes it.
pub struct Session {
    pub api: Arc<ApiClient>,
    pub manager: SessionManager,
}

impl Session {
    pub fn open(config: &FolioConfig) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.session_file()));
        let api = Arc::new(ApiClient::with_timeout(
            config.api_url(),
            store,
            config.timeout(),
        )?);
        let manager = SessionManager::new(api.subscribe());
        Ok(Self { api, manager })
    }

    /// Run the auth guard; anything but an accepted credential stops the command.
    pub async fn require_dashboard(&mut self) -> Result<()> {
        match self.manager.enter_dashboard(self.api.as_ref()).await {
            GuardState::Authenticated => Ok(()),
            _ => anyhow::bail!("Not logged in. Run 'folio login' first."),
        }
    }

    /// Fail if a response during the command evicted the session.
    pub fn ensure_still_authenticated(&mut self) -> Result<()> {
        self.manager.pump();
        if self.manager.route() == Route::Login {
            anyhow::bail!("Session expired. Run 'folio login' again.");
        }
        Ok(())
    }
}
