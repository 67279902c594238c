//! Create/edit form state for a project.
//!
//! The form is pure input capture: it holds a draft, runs the
//! required-field gate on submit and hands back a [`ProjectPayload`]. It
//! never talks to the network.

use super::media::{self, MediaPreview};
use super::models::{MediaType, Project, ProjectPayload};
use crate::errors::FormError;

/// Keys the tag field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey {
    Enter,
    Comma,
    Backspace,
}

/// Tag entry: text is committed as a tag on Enter, comma or blur.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInput {
    tags: Vec<String>,
    input: String,
}

impl TagInput {
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            tags,
            input: String::new(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn key(&mut self, key: TagKey) {
        match key {
            TagKey::Enter | TagKey::Comma => {
                self.commit();
            }
            TagKey::Backspace => {
                if self.input.is_empty() {
                    self.tags.pop();
                } else {
                    self.input.pop();
                }
            }
        }
    }

    /// Leaving the field commits whatever was typed.
    pub fn blur(&mut self) {
        self.commit();
    }

    /// Commit the current text. Returns whether a tag was added.
    ///
    /// A duplicate (exact, case-sensitive) is not added and its text stays
    /// in the field.
    pub fn commit(&mut self) -> bool {
        let value = self.input.trim();
        if value.is_empty() || self.tags.iter().any(|t| t == value) {
            return false;
        }
        self.tags.push(value.to_string());
        self.input.clear();
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    /// Type a stream of characters; commas and newlines act as their keys.
    pub fn feed(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                ',' => self.key(TagKey::Comma),
                '\n' | '\r' => self.key(TagKey::Enter),
                _ => self.input.push(c),
            }
        }
    }

    pub fn into_tags(self) -> Vec<String> {
        self.tags
    }
}

/// Split user text into tags with the same rules as the tag field.
pub fn parse_tags(text: &str) -> Vec<String> {
    let mut input = TagInput::default();
    input.feed(text);
    input.blur();
    input.into_tags()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    pub tags: TagInput,
    pub image: String,
    pub link: String,
    pub media_type: MediaType,
}

impl ProjectForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            tags: TagInput::default(),
            image: String::new(),
            link: String::new(),
            media_type: MediaType::Image,
        }
    }

    /// Draft seeded from an existing project.
    pub fn edit(project: &Project) -> Self {
        Self {
            mode: FormMode::Edit {
                id: project.id.clone(),
            },
            title: project.title.clone(),
            description: project.description.clone(),
            tags: TagInput::new(project.tags.clone()),
            image: project.image.clone(),
            link: project.link.clone().unwrap_or_default(),
            media_type: project.media_type,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { id } => Some(id),
            FormMode::Create => None,
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("image", &self.image),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn preview(&self) -> MediaPreview {
        media::classify(&self.image, self.media_type)
    }

    /// Run the required-field gate and produce the request payload.
    ///
    /// All-or-nothing: if any required field is blank no payload is made.
    pub fn submit(&self) -> Result<ProjectPayload, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::Incomplete { missing });
        }
        let link = self.link.trim();
        Ok(ProjectPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.tags().to_vec(),
            image: self.image.clone(),
            link: (!link.is_empty()).then(|| link.to_string()),
            media_type: self.media_type,
        })
    }
}
