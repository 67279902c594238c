use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(format!("Invalid media type: {}", s)),
        }
    }
}

/// One portfolio item as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    /// Server-side position. Array position wins during a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Project {
    /// Whether the record carries every field the admin view needs to show it.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.image.trim().is_empty()
    }

    /// The editable fields of this project, shaped for create/update requests.
    pub fn payload(&self) -> ProjectPayload {
        ProjectPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            image: self.image.clone(),
            link: self.link.clone(),
            media_type: self.media_type,
        }
    }
}

/// Request body for create and update: project fields minus `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image: String,
    /// Always sent; `null` clears a stored link.
    pub link: Option<String>,
    pub media_type: MediaType,
}

/// Desired absolute position of one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectOrder {
    pub id: String,
    pub order: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub projects: Vec<ProjectOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    pub token: Option<String>,
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            token: None,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_project(id: &str, title: &str) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        tags: vec!["rust".to_string()],
        image: format!("https://cdn.example.com/{}.png", id),
        link: None,
        media_type: MediaType::Image,
        order_index: None,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_roundtrip() {
        for media in [MediaType::Image, MediaType::Video] {
            assert_eq!(MediaType::from_str(media.as_str()).unwrap(), media);
        }
        assert!(MediaType::from_str("gif").is_err());
    }

    #[test]
    fn test_project_deserializes_server_shape() {
        let json = r#"{
            "id": "p1",
            "title": "Site",
            "description": "My site",
            "tags": ["web"],
            "image": "/img/site.png",
            "link": "https://example.com",
            "media_type": "video",
            "order_index": 3,
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.media_type, MediaType::Video);
        assert_eq!(project.order_index, Some(3));
        assert_eq!(project.link.as_deref(), Some("https://example.com"));
        assert_eq!(project.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(project.updated_at.is_none());
    }

    #[test]
    fn test_project_missing_optional_fields_uses_defaults() {
        let json = r#"{"id":"p1","title":"T","description":"D","image":"x.png"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.tags.is_empty());
        assert_eq!(project.media_type, MediaType::Image);
        assert!(project.order_index.is_none());
    }

    #[test]
    fn test_payload_omits_id_and_order() {
        let mut project = sample_project("p9", "Nine");
        project.order_index = Some(4);
        let value = serde_json::to_value(project.payload()).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("order_index").is_none());
        assert!(value.get("link").is_some_and(|link| link.is_null()));
        assert_eq!(value["media_type"], "image");
        assert_eq!(value["title"], "Nine");
    }

    #[test]
    fn test_is_complete_rejects_blank_fields() {
        let mut project = sample_project("p1", "One");
        assert!(project.is_complete());
        project.image = "  ".to_string();
        assert!(!project.is_complete());
    }

    #[test]
    fn test_reorder_request_wire_shape() {
        let body = ReorderRequest {
            projects: vec![ProjectOrder {
                id: "a".into(),
                order: 0,
            }],
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value, serde_json::json!({"projects": [{"id": "a", "order": 0}]}));
    }
}
