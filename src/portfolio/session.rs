//! Session persistence and navigation.
//!
//! The credential lives behind the [`SessionStore`] trait so the API client
//! can be exercised without a real disk. [`SessionManager`] is the only
//! place that decides where the user ends up: the client reports auth
//! changes as [`AuthEvent`]s and the manager turns them into a [`Route`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use super::api::{ApiClient, TokenVerifier};
use super::guard::{AuthGuard, GuardState};
use super::models::AuthResponse;
use crate::errors::StoreError;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "admin-token";
/// Key holding the "authenticated" marker.
pub const AUTHENTICATED_KEY: &str = "admin-authenticated";

/// Key/value storage for the client session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn clear(&self, key: &str) -> Result<(), StoreError>;

    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn save_credential(&self, token: &str) -> Result<(), StoreError> {
        self.set(TOKEN_KEY, token)?;
        self.set(AUTHENTICATED_KEY, "true")
    }

    fn mark_authenticated(&self) -> Result<(), StoreError> {
        self.set(AUTHENTICATED_KEY, "true")
    }

    fn is_marked_authenticated(&self) -> bool {
        self.get(AUTHENTICATED_KEY).as_deref() == Some("true")
    }

    fn clear_credential(&self) -> Result<(), StoreError> {
        self.clear(TOKEN_KEY)?;
        self.clear(AUTHENTICATED_KEY)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(key);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

/// JSON file on disk, used by the CLI between invocations.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous session intact. The file is removed
/// once its last key is cleared.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the session file was last written, if it exists.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.read().ok().and_then(|f| f.saved_at)
    }

    fn read(&self) -> Result<SessionFile, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Serde {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, mut file: SessionFile) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if file.values.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_err(e)),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        file.saved_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Serde {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().ok()?;
        match self.read() {
            Ok(mut file) => file.values.remove(key),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        // A corrupt file is replaced rather than blocking a fresh login.
        let mut file = self.read().unwrap_or_default();
        file.values.insert(key.to_string(), value.to_string());
        self.write(file)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut file = self.read().unwrap_or_default();
        file.values.remove(key);
        self.write(file)
    }
}

/// Auth changes reported by the API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn,
    LoggedOut,
    /// A response came back 401; the credential is already gone.
    Unauthorized,
}

/// Where the admin surface currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/admin",
            Self::Dashboard => "/admin/dashboard",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Owns navigation for the admin surface.
pub struct SessionManager {
    route: Route,
    guard: AuthGuard,
    events: broadcast::Receiver<AuthEvent>,
}

impl SessionManager {
    pub fn new(events: broadcast::Receiver<AuthEvent>) -> Self {
        Self {
            route: Route::Home,
            guard: AuthGuard::new(),
            events,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!(from = %self.route, to = %route, "Navigating");
        }
        self.route = route;
    }

    /// Apply every auth event received so far. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        self.drain(true)
    }

    /// Evictions restart the guard only when `restart_guard` is set. Events
    /// raised by the guard's own check are already reflected in its state.
    fn drain(&mut self, restart_guard: bool) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.apply(event, restart_guard);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    // Missed events may have included an eviction.
                    tracing::warn!(missed, "Auth events lagged; returning to login");
                    if restart_guard {
                        self.guard.restart();
                    }
                    self.navigate(Route::Login);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        handled
    }

    fn apply(&mut self, event: AuthEvent, restart_guard: bool) {
        tracing::debug!(?event, "Auth event");
        match event {
            AuthEvent::LoggedIn => self.navigate(Route::Dashboard),
            AuthEvent::LoggedOut | AuthEvent::Unauthorized => {
                if restart_guard {
                    self.guard.restart();
                }
                self.navigate(Route::Login);
            }
        }
    }

    /// Login page submit. A blank password never reaches the server.
    pub async fn login(&mut self, api: &ApiClient, password: &str) -> AuthResponse {
        if password.trim().is_empty() {
            return AuthResponse::failed("Please enter a password");
        }
        let response = api.login(password).await;
        self.pump();
        response
    }

    pub fn logout(&mut self, api: &ApiClient) {
        api.logout();
        self.pump();
    }

    /// Navigate to the guarded dashboard, running the auth guard first.
    pub async fn enter_dashboard<V>(&mut self, verifier: &V) -> GuardState
    where
        V: TokenVerifier + ?Sized,
    {
        self.pump();
        self.guard.restart();
        let state = self.guard.check(verifier).await;
        self.drain(false);
        match state {
            GuardState::Authenticated => self.navigate(Route::Dashboard),
            _ => self.navigate(Route::Login),
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_credential_lifecycle() {
        let store = MemoryStore::new();
        assert!(store.token().is_none());
        store.save_credential("tok").unwrap();
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert!(store.is_marked_authenticated());
        store.clear_credential().unwrap();
        assert!(store.token().is_none());
        assert!(!store.is_marked_authenticated());
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "").unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_file_store_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        FileStore::new(&path).save_credential("abc").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.token().as_deref(), Some("abc"));
        assert!(reopened.is_marked_authenticated());
        assert!(reopened.saved_at().is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_removes_file_when_cleared() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::new(&path);
        store.save_credential("abc").unwrap();
        assert!(path.exists());
        store.clear_credential().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_ignores_corrupt_file_on_read_and_replaces_on_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        assert!(store.token().is_none());
        store.save_credential("fresh").unwrap();
        assert_eq!(store.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_clear_on_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("missing.json"));
        assert!(store.clear_credential().is_ok());
    }

    #[test]
    fn test_pump_routes_unauthorized_to_login() {
        let (tx, rx) = broadcast::channel(8);
        let mut session = SessionManager::new(rx);
        session.navigate(Route::Dashboard);
        tx.send(AuthEvent::Unauthorized).unwrap();
        assert_eq!(session.pump(), 1);
        assert_eq!(session.route(), Route::Login);
    }

    #[test]
    fn test_pump_routes_login_to_dashboard() {
        let (tx, rx) = broadcast::channel(8);
        let mut session = SessionManager::new(rx);
        tx.send(AuthEvent::LoggedIn).unwrap();
        session.pump();
        assert_eq!(session.route(), Route::Dashboard);
    }

    #[test]
    fn test_pump_treats_lag_as_eviction() {
        let (tx, rx) = broadcast::channel(1);
        let mut session = SessionManager::new(rx);
        tx.send(AuthEvent::LoggedIn).unwrap();
        tx.send(AuthEvent::LoggedIn).unwrap();
        tx.send(AuthEvent::LoggedIn).unwrap();
        session.pump();
        // Lag is reported first, then the newest retained event applies.
        assert_eq!(session.route(), Route::Dashboard);

        let (tx, rx) = broadcast::channel(1);
        let mut session = SessionManager::new(rx);
        tx.send(AuthEvent::LoggedIn).unwrap();
        tx.send(AuthEvent::Unauthorized).unwrap();
        session.pump();
        assert_eq!(session.route(), Route::Login);
    }

    /// Rejects the credential and reports the eviction, as `ApiClient` does on a 401.
    struct EvictingVerifier {
        events: broadcast::Sender<AuthEvent>,
    }

    #[async_trait::async_trait]
    impl TokenVerifier for EvictingVerifier {
        fn has_credential(&self) -> bool {
            true
        }

        async fn verify_token(&self) -> bool {
            let _ = self.events.send(AuthEvent::Unauthorized);
            false
        }

        fn clear_credential(&self) {}

        fn mark_authenticated(&self) {}
    }

    #[tokio::test]
    async fn test_eviction_during_check_leaves_guard_unauthenticated() {
        let (tx, rx) = broadcast::channel(8);
        let mut session = SessionManager::new(rx);
        let verifier = EvictingVerifier { events: tx };

        let state = session.enter_dashboard(&verifier).await;
        assert_eq!(state, GuardState::Unauthenticated);
        assert_eq!(session.guard().state(), GuardState::Unauthenticated);
        assert_eq!(session.route(), Route::Login);
    }

    #[tokio::test]
    async fn test_enter_dashboard_drains_older_events_first() {
        let (tx, rx) = broadcast::channel(8);
        let mut session = SessionManager::new(rx);
        tx.send(AuthEvent::LoggedOut).unwrap();

        let verifier = EvictingVerifier { events: tx };
        session.enter_dashboard(&verifier).await;
        assert_eq!(session.guard().state(), GuardState::Unauthenticated);
        assert_eq!(session.pump(), 0);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.to_string(), "/admin");
        assert_eq!(Route::Dashboard.as_str(), "/admin/dashboard");
    }
}
