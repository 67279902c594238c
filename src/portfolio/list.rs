//! The admin view's project collection and its synchronization with the API.
//!
//! ## Reorder lifecycle
//!
//! ```text
//!  begin_reorder()           settle_reorder(Ok)
//! Idle ──────────> Pending ─────────────────────> Confirmed ──> Idle
//!                     │
//!                     │ settle_reorder(Err)   refetch
//!                     └──────────────────> Reverting ──────> Idle
//! ```
//!
//! `begin_reorder` applies the move and renumbers `order_index` before any
//! request is made. On failure the optimistic list is thrown away and the
//! server's list replaces it. While a reorder is `Pending` or `Reverting`,
//! further reorders and deletes are refused.
//!
//! List-level requests (load, reorder, refetch) are numbered by
//! [`RequestLedger`]. A reorder answer is dropped only when a server list
//! dispatched after it has already replaced local state. Other operations
//! hold `&mut self` across their request and need no tagging.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use super::api::{ApiResult, ProjectApi};
use super::drag::DragReorder;
use super::form::ProjectForm;
use super::models::{Project, ProjectOrder};
use crate::errors::{ApiError, ListError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            description: None,
        }
    }

    pub fn error(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            description: Some(description.into()),
        }
    }

    /// Error toast for a failed API call. Transport failures get a
    /// "Network error" headline with the operation as the description.
    fn from_api(message: &str, err: &ApiError) -> Self {
        match err {
            ApiError::Network(op) => Self::error("Network error", op.clone()),
            other => Self::error(message, other.description()),
        }
    }
}

/// Monotonic sequence numbers for list-level requests.
#[derive(Debug, Default)]
pub struct RequestLedger {
    next: u64,
    applied: u64,
}

impl RequestLedger {
    pub fn dispatch(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Record that the server list fetched by `seq` replaced local state.
    pub fn record_applied(&mut self, seq: u64) {
        self.applied = self.applied.max(seq);
    }

    /// Whether a server list dispatched after `seq` has been applied.
    pub fn is_superseded(&self, seq: u64) -> bool {
        self.applied > seq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending {
        seq: u64,
    },
    Confirmed,
    Reverting,
}

/// A dispatched optimistic reorder, waiting for the server's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderTicket {
    seq: u64,
    orders: Vec<ProjectOrder>,
}

impl ReorderTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn orders(&self) -> &[ProjectOrder] {
        &self.orders
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Confirmed,
    /// The server rejected the order; local state now mirrors the server.
    Reverted,
    /// A newer server list replaced local state meanwhile; this answer was ignored.
    Superseded,
}

/// Standard single-element array move.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

pub fn assign_positions(projects: &mut [Project]) {
    for (index, project) in projects.iter_mut().enumerate() {
        project.order_index = Some(index as i64);
    }
}

pub struct ProjectListController<A: ProjectApi + ?Sized> {
    api: Arc<A>,
    projects: Vec<Project>,
    loading: bool,
    reorder: MutationState,
    /// Pre-drag order, used only if the corrective refetch also fails.
    reorder_snapshot: Option<Vec<Project>>,
    pending_delete: Option<String>,
    ledger: RequestLedger,
    notices: broadcast::Sender<Notification>,
}

impl<A: ProjectApi + ?Sized> ProjectListController<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (notices, _rx) = broadcast::channel(64);
        Self {
            api,
            projects: Vec::new(),
            loading: false,
            reorder: MutationState::Idle,
            reorder_snapshot: None,
            pending_delete: None,
            ledger: RequestLedger::default(),
            notices,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notices.subscribe()
    }

    pub fn reorder_state(&self) -> MutationState {
        self.reorder
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_reordering(&self) -> bool {
        matches!(
            self.reorder,
            MutationState::Pending { .. } | MutationState::Reverting
        )
    }

    /// Drag and destructive actions are disabled while this is true.
    pub fn is_busy(&self) -> bool {
        self.loading || self.is_reordering()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    fn notify(&self, notice: Notification) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(notice = %notice.message, "Notify"),
            NoticeLevel::Error => tracing::warn!(
                notice = %notice.message,
                description = notice.description.as_deref().unwrap_or(""),
                "Notify"
            ),
        }
        let _ = self.notices.send(notice); // Ignore error if no receivers
    }

    /// Replace the collection, keeping only displayable, uniquely-identified projects.
    fn replace_all(&mut self, projects: Vec<Project>) {
        let mut seen = HashSet::new();
        self.projects = projects
            .into_iter()
            .filter(|p| {
                if !p.is_complete() {
                    tracing::warn!(id = %p.id, "Dropping project with missing required fields");
                    return false;
                }
                if !seen.insert(p.id.clone()) {
                    tracing::warn!(id = %p.id, "Dropping duplicate project id");
                    return false;
                }
                true
            })
            .collect();
    }

    /// Fetch the server list and apply it on success.
    async fn fetch_list(&mut self) -> Result<(), ApiError> {
        let seq = self.ledger.dispatch();
        let response = self.api.get_projects().await?;
        self.replace_all(response.data);
        self.ledger.record_applied(seq);
        Ok(())
    }

    /// Initial load. On failure the list keeps its prior contents.
    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.fetch_list().await;
        self.loading = false;
        match result {
            Ok(()) => {
                tracing::debug!(count = self.projects.len(), "Projects loaded");
                true
            }
            Err(e) => {
                self.notify(Notification::from_api("Failed to load projects", &e));
                false
            }
        }
    }

    /// Save a new project. Nothing is shown until the server assigns an id.
    ///
    /// `Err` means the submission was refused client-side and the dialog
    /// should stay open. `Ok(None)` means the server call failed and was
    /// reported; the dialog closes either way.
    pub async fn create(&mut self, form: &ProjectForm) -> Result<Option<Project>, ListError> {
        let payload = form.submit()?;
        if self.loading {
            return Err(ListError::Busy);
        }

        self.loading = true;
        let result = self.api.create_project(&payload).await;
        self.loading = false;

        match result {
            Ok(response) => {
                let project = response.data;
                if self.find(&project.id).is_none() {
                    self.projects.push(project.clone());
                }
                self.notify(Notification::success("Project created successfully"));
                Ok(Some(project))
            }
            Err(e) => {
                self.notify(Notification::from_api("Failed to create project", &e));
                Ok(None)
            }
        }
    }

    /// Save edits to an existing project, keeping its position.
    pub async fn update(
        &mut self,
        id: &str,
        form: &ProjectForm,
    ) -> Result<Option<Project>, ListError> {
        let payload = form.submit()?;
        if self.loading {
            return Err(ListError::Busy);
        }

        self.loading = true;
        let result = self.api.update_project(id, &payload).await;
        self.loading = false;

        match result {
            Ok(response) => {
                let updated = response.data;
                match self.projects.iter_mut().find(|p| p.id == id) {
                    Some(slot) => *slot = updated.clone(),
                    None => tracing::debug!(id, "Updated project no longer listed"),
                }
                self.notify(Notification::success("Project updated successfully"));
                Ok(Some(updated))
            }
            Err(e) => {
                self.notify(Notification::from_api("Failed to update project", &e));
                Ok(None)
            }
        }
    }

    /// First phase of a delete: open the confirmation.
    pub fn request_delete(&mut self, id: &str) -> Result<(), ListError> {
        if self.is_reordering() {
            return Err(ListError::Busy);
        }
        if self.find(id).is_none() {
            return Err(ListError::UnknownProject { id: id.to_string() });
        }
        self.pending_delete = Some(id.to_string());
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second phase of a delete. The confirmation closes whatever happens.
    pub async fn confirm_delete(&mut self) -> Result<bool, ListError> {
        if self.is_busy() {
            return Err(ListError::Busy);
        }
        let id = self.pending_delete.take().ok_or(ListError::NoPendingDelete)?;

        self.loading = true;
        let result = self.api.delete_project(&id).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.projects.retain(|p| p.id != id);
                self.notify(Notification::success("Project deleted successfully"));
                Ok(true)
            }
            Err(e) => {
                self.notify(Notification::from_api("Failed to delete project", &e));
                Ok(false)
            }
        }
    }

    /// Apply a move locally and hand back the request to send.
    pub fn begin_reorder(&mut self, from: usize, to: usize) -> Result<ReorderTicket, ListError> {
        if self.is_busy() {
            return Err(ListError::Busy);
        }
        let len = self.projects.len();
        for index in [from, to] {
            if index >= len {
                return Err(ListError::InvalidPosition { index, len });
            }
        }

        self.reorder_snapshot = Some(self.projects.clone());
        move_item(&mut self.projects, from, to);
        assign_positions(&mut self.projects);

        let seq = self.ledger.dispatch();
        self.reorder = MutationState::Pending { seq };
        tracing::debug!(from, to, seq, "Optimistic reorder applied");

        let orders = self
            .projects
            .iter()
            .enumerate()
            .map(|(order, p)| ProjectOrder {
                id: p.id.clone(),
                order,
            })
            .collect();
        Ok(ReorderTicket { seq, orders })
    }

    /// Resolve a dispatched reorder with the server's answer.
    pub async fn settle_reorder(
        &mut self,
        ticket: ReorderTicket,
        result: ApiResult<()>,
    ) -> ReorderOutcome {
        let snapshot = self.reorder_snapshot.take();

        if self.reorder != (MutationState::Pending { seq: ticket.seq })
            || self.ledger.is_superseded(ticket.seq)
        {
            tracing::debug!(seq = ticket.seq, "Reorder answer superseded");
            if self.reorder == (MutationState::Pending { seq: ticket.seq }) {
                self.reorder = MutationState::Idle;
            }
            return ReorderOutcome::Superseded;
        }

        match result {
            Ok(_) => {
                self.reorder = MutationState::Confirmed;
                self.notify(Notification::success("Project order updated successfully"));
                self.reorder = MutationState::Idle;
                ReorderOutcome::Confirmed
            }
            Err(e) => {
                self.reorder = MutationState::Reverting;
                self.notify(Notification::from_api("Failed to update project order", &e));

                if let Err(refetch_err) = self.fetch_list().await {
                    if let Some(previous) = snapshot {
                        self.projects = previous;
                    }
                    self.notify(Notification::from_api(
                        "Failed to reload projects",
                        &refetch_err,
                    ));
                }
                self.reorder = MutationState::Idle;
                ReorderOutcome::Reverted
            }
        }
    }

    /// Move the project at `from` to `to` and sync the new order.
    pub async fn reorder(&mut self, from: usize, to: usize) -> Result<ReorderOutcome, ListError> {
        let ticket = self.begin_reorder(from, to)?;
        let result = self.api.update_project_order(ticket.orders()).await;
        Ok(self.settle_reorder(ticket, result).await)
    }

    /// Finish a drag gesture. A drop that resolves to no move does nothing.
    pub async fn drop_on(
        &mut self,
        drag: &mut DragReorder,
        active_id: &str,
        over_id: Option<&str>,
    ) -> Result<Option<ReorderOutcome>, ListError> {
        drag.set_enabled(!self.is_busy());
        match drag.end(&self.projects, active_id, over_id) {
            Some((from, to)) => self.reorder(from, to).await.map(Some),
            None => Ok(None),
        }
    }
}
