//! Classify a project's media URL the way the admin preview renders it.

use std::sync::LazyLock;

use regex::Regex;

use super::models::MediaType;

// Compile regexes once using LazyLock
static IMAGE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\./|\.\./|/|https?://).*\.(jpg|jpeg|png|gif|webp|svg|bmp|ico)(\?.*)?$")
        .unwrap()
});

static YOUTUBE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .unwrap()
});

static VIDEO_FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mp4|webm|ogg|mov|avi|wmv|flv|mkv)(\?.*)?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPreview {
    /// Nothing entered yet.
    Empty,
    Image { local: bool },
    YouTube { video_id: String },
    VideoFile,
    Invalid(&'static str),
}

impl MediaPreview {
    pub fn is_valid(&self) -> bool {
        !matches!(self, MediaPreview::Invalid(_))
    }

    /// Short human-readable summary for terminal output.
    pub fn describe(&self) -> String {
        match self {
            MediaPreview::Empty => "no media yet".to_string(),
            MediaPreview::Image { local: true } => "local image".to_string(),
            MediaPreview::Image { local: false } => "remote image".to_string(),
            MediaPreview::YouTube { video_id } => format!("YouTube video ({})", embed_url(video_id)),
            MediaPreview::VideoFile => "video file".to_string(),
            MediaPreview::Invalid(reason) => format!("invalid: {}", reason),
        }
    }
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

pub fn classify(url: &str, media_type: MediaType) -> MediaPreview {
    if url.trim().is_empty() {
        return MediaPreview::Empty;
    }

    match media_type {
        MediaType::Image => {
            if IMAGE_URL_REGEX.is_match(url) {
                let local = url.starts_with("./") || url.starts_with("../") || url.starts_with('/');
                MediaPreview::Image { local }
            } else {
                MediaPreview::Invalid(
                    "use a direct link to an image file or a local path",
                )
            }
        }
        MediaType::Video => {
            if let Some(caps) = YOUTUBE_REGEX.captures(url) {
                return MediaPreview::YouTube {
                    video_id: caps[1].to_string(),
                };
            }
            if VIDEO_FILE_REGEX.is_match(url) {
                MediaPreview::VideoFile
            } else {
                MediaPreview::Invalid(
                    "use a YouTube link or a direct .mp4, .webm, .ogg, .mov or .avi URL",
                )
            }
        }
    }
}
