//! Turns drag gesture start/end events into an index pair for reordering.

use super::models::Project;

#[derive(Debug)]
pub struct DragReorder {
    active: Option<Project>,
    enabled: bool,
}

impl Default for DragReorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DragReorder {
    pub fn new() -> Self {
        Self {
            active: None,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drag is switched off while any mutating or loading operation runs.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.active = None;
        }
    }

    /// The project being dragged, for overlay feedback only.
    pub fn active(&self) -> Option<&Project> {
        self.active.as_ref()
    }

    pub fn start(&mut self, projects: &[Project], active_id: &str) -> Option<&Project> {
        if !self.enabled {
            return None;
        }
        self.active = projects.iter().find(|p| p.id == active_id).cloned();
        self.active.as_ref()
    }

    /// Resolve a drop into `(from, to)` indices.
    ///
    /// Returns `None` when there is no drop target, the target is the
    /// dragged project itself, either id is unknown, or drag is disabled.
    pub fn end(
        &mut self,
        projects: &[Project],
        active_id: &str,
        over_id: Option<&str>,
    ) -> Option<(usize, usize)> {
        self.active = None;
        if !self.enabled {
            return None;
        }
        let over_id = over_id?;
        if over_id == active_id {
            return None;
        }
        let from = projects.iter().position(|p| p.id == active_id)?;
        let to = projects.iter().position(|p| p.id == over_id)?;
        Some((from, to))
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
