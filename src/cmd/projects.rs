//! Project commands: list, show, add, edit, delete and move.
//!
//! Each command opens the guarded dashboard first, then drives a
//! `ProjectListController` and prints whatever notifications it raised.

use anyhow::{Context, Result};
use console::style;
use tokio::sync::broadcast;

use folio::config::FolioConfig;
use folio::errors::ListError;
use folio::portfolio::api::{ApiClient, ProjectApi};
use folio::portfolio::drag::DragReorder;
use folio::portfolio::form::ProjectForm;
use folio::portfolio::list::{NoticeLevel, Notification, ProjectListController, ReorderOutcome};
use folio::portfolio::models::MediaType;
use folio::ui::icons::{MOVE, SPARKLE, TRASH};
use folio::ui::{RequestSpinner, print_notification, print_project, print_project_table};

use super::Session;

/// Field values given on the command line for add/edit.
#[derive(Debug, Default)]
pub struct ProjectFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Option<String>,
    pub link: Option<String>,
    pub media_type: Option<MediaType>,
}

impl ProjectFields {
    fn apply(self, form: &mut ProjectForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(image) = self.image {
            form.image = image;
        }
        if let Some(tags) = self.tags {
            form.tags = Default::default();
            form.tags.feed(&tags);
            form.tags.blur();
        }
        if let Some(link) = self.link {
            form.link = link;
        }
        if let Some(media_type) = self.media_type {
            form.media_type = media_type;
        }
    }
}

/// Print queued notifications. Returns whether any was an error.
fn drain_notices(rx: &mut broadcast::Receiver<Notification>) -> bool {
    let mut failed = false;
    while let Ok(notice) = rx.try_recv() {
        failed |= notice.level == NoticeLevel::Error;
        print_notification(&notice);
    }
    failed
}

struct Dashboard {
    session: Session,
    controller: ProjectListController<ApiClient>,
    notices: broadcast::Receiver<Notification>,
}

impl Dashboard {
    async fn open(config: &FolioConfig) -> Result<Self> {
        let mut session = Session::open(config)?;
        session.require_dashboard().await?;
        let controller = ProjectListController::new(session.api.clone());
        let notices = controller.subscribe();
        Ok(Self {
            session,
            controller,
            notices,
        })
    }

    async fn load(&mut self, quiet: bool) -> Result<()> {
        let spinner = RequestSpinner::start("Loading projects...", quiet);
        let loaded = self.controller.load().await;
        spinner.clear();
        self.finish_step()?;
        if !loaded {
            anyhow::bail!("Failed to load projects");
        }
        Ok(())
    }

    /// Print notifications and check the session survived the request.
    fn finish_step(&mut self) -> Result<()> {
        if drain_notices(&mut self.notices) {
            tracing::debug!("Request reported an error");
        }
        self.session.ensure_still_authenticated()
    }
}

fn warn_on_preview(form: &ProjectForm) {
    let preview = form.preview();
    if !preview.is_valid() {
        eprintln!(
            "{} media URL looks wrong ({})",
            style("warning:").yellow().bold(),
            preview.describe()
        );
    }
}

pub async fn cmd_list(config: &FolioConfig, json: bool) -> Result<()> {
    let mut dashboard = Dashboard::open(config).await?;
    dashboard.load(json).await?;

    let projects = dashboard.controller.projects();
    if json {
        let out = serde_json::to_string_pretty(projects).context("Failed to serialize projects")?;
        println!("{}", out);
    } else {
        print_project_table(projects);
    }
    Ok(())
}

pub async fn cmd_show(config: &FolioConfig, id: &str) -> Result<()> {
    let mut session = Session::open(config)?;
    session.require_dashboard().await?;

    let spinner = RequestSpinner::start("Fetching project...", false);
    let result = session.api.get_project(id).await;
    spinner.clear();
    session.ensure_still_authenticated()?;

    match result {
        Ok(response) => {
            print_project(&response.data);
            Ok(())
        }
        Err(e) => anyhow::bail!("Failed to fetch project {}: {}", id, e.description()),
    }
}

pub async fn cmd_add(config: &FolioConfig, fields: ProjectFields) -> Result<()> {
    let mut form = ProjectForm::create();
    fields.apply(&mut form);
    warn_on_preview(&form);

    let mut dashboard = Dashboard::open(config).await?;
    let spinner = RequestSpinner::start("Creating project...", false);
    let result = dashboard.controller.create(&form).await;
    spinner.clear();
    dashboard.finish_step()?;

    match result? {
        Some(project) => {
            println!("{}Created {} ({})", SPARKLE, style(&project.title).bold(), project.id);
            Ok(())
        }
        None => anyhow::bail!("Project was not created"),
    }
}

pub async fn cmd_edit(config: &FolioConfig, id: &str, fields: ProjectFields) -> Result<()> {
    let mut dashboard = Dashboard::open(config).await?;
    dashboard.load(false).await?;

    let current = dashboard
        .controller
        .find(id)
        .ok_or_else(|| ListError::UnknownProject { id: id.to_string() })?;
    let mut form = ProjectForm::edit(current);
    fields.apply(&mut form);
    warn_on_preview(&form);

    let spinner = RequestSpinner::start("Saving project...", false);
    let result = dashboard.controller.update(id, &form).await;
    spinner.clear();
    dashboard.finish_step()?;

    match result? {
        Some(project) => {
            println!("{}Updated {}", SPARKLE, style(&project.title).bold());
            Ok(())
        }
        None => anyhow::bail!("Project was not updated"),
    }
}

pub async fn cmd_delete(config: &FolioConfig, id: &str, yes: bool) -> Result<()> {
    use dialoguer::Confirm;

    let mut dashboard = Dashboard::open(config).await?;
    dashboard.load(false).await?;
    dashboard.controller.request_delete(id)?;

    if !yes {
        let title = dashboard
            .controller
            .find(id)
            .map(|p| p.title.clone())
            .unwrap_or_default();
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Delete \"{}\"? This action cannot be undone.",
                title
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirm {
            dashboard.controller.cancel_delete();
            println!("Delete cancelled");
            return Ok(());
        }
    }

    let spinner = RequestSpinner::start("Deleting project...", false);
    let deleted = dashboard.controller.confirm_delete().await;
    spinner.clear();
    dashboard.finish_step()?;

    if deleted? {
        println!("{}Deleted {}", TRASH, id);
        Ok(())
    } else {
        anyhow::bail!("Project was not deleted")
    }
}

pub async fn cmd_move(config: &FolioConfig, id: &str, over: &str) -> Result<()> {
    let mut dashboard = Dashboard::open(config).await?;
    dashboard.load(false).await?;

    for project_id in [id, over] {
        if dashboard.controller.find(project_id).is_none() {
            return Err(ListError::UnknownProject {
                id: project_id.to_string(),
            }
            .into());
        }
    }

    let mut drag = DragReorder::new();
    drag.start(dashboard.controller.projects(), id);

    let spinner = RequestSpinner::start("Updating project order...", false);
    let outcome = dashboard.controller.drop_on(&mut drag, id, Some(over)).await;
    spinner.clear();
    dashboard.finish_step()?;

    match outcome? {
        None => {
            println!("Nothing to move");
            Ok(())
        }
        Some(ReorderOutcome::Confirmed) => {
            println!("{}New order:", MOVE);
            print_project_table(dashboard.controller.projects());
            Ok(())
        }
        Some(ReorderOutcome::Reverted) => {
            print_project_table(dashboard.controller.projects());
            anyhow::bail!("Project order was not changed")
        }
        Some(ReorderOutcome::Superseded) => {
            anyhow::bail!("Project order changed elsewhere; run 'folio list' to see it")
        }
    }
}
