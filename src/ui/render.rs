//! Terminal rendering for projects and notifications.

use console::style;

use crate::portfolio::list::{NoticeLevel, Notification};
use crate::portfolio::media;
use crate::portfolio::models::{MediaType, Project};
use crate::ui::icons::{CHECK, CROSS, IMAGE, LINK, VIDEO};

const TITLE_WIDTH: usize = 32;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut)
}

pub fn format_notification(notice: &Notification) -> String {
    let headline = match notice.level {
        NoticeLevel::Success => format!("{}{}", CHECK, style(&notice.message).green()),
        NoticeLevel::Error => format!("{}{}", CROSS, style(&notice.message).red().bold()),
    };
    match &notice.description {
        Some(description) => format!("{}\n   {}", headline, style(description).dim()),
        None => headline,
    }
}

/// Toasts go to stderr.
pub fn print_notification(notice: &Notification) {
    eprintln!("{}", format_notification(notice));
}

pub fn format_project_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet. Add one with 'folio add'.".to_string();
    }

    let id_width = projects
        .iter()
        .map(|p| p.id.chars().count())
        .max()
        .unwrap_or(2)
        .max(2);

    let mut out = format!(
        "{:<4} {:<id_width$} {:<title_width$} {:<6} Tags\n",
        "#",
        "ID",
        "Title",
        "Media",
        title_width = TITLE_WIDTH,
    );
    out.push_str(&format!(
        "{:<4} {:<id_width$} {:<title_width$} {:<6} ----\n",
        "----",
        "-".repeat(id_width),
        "-".repeat(TITLE_WIDTH),
        "-----",
        title_width = TITLE_WIDTH,
    ));
    for (index, project) in projects.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<id_width$} {:<title_width$} {:<6} {}\n",
            index + 1,
            project.id,
            truncate(&project.title, TITLE_WIDTH),
            project.media_type,
            project.tags.join(", "),
            title_width = TITLE_WIDTH,
        ));
    }
    out
}

pub fn print_project_table(projects: &[Project]) {
    println!();
    print!("{}", format_project_table(projects));
    println!();
}

pub fn format_project(project: &Project) -> String {
    let icon = match project.media_type {
        MediaType::Image => IMAGE,
        MediaType::Video => VIDEO,
    };
    let preview = media::classify(&project.image, project.media_type);

    let mut lines = vec![
        format!("{}", style(&project.title).bold()),
        format!("  id:          {}", project.id),
        format!("  description: {}", project.description),
        format!(
            "  tags:        {}",
            if project.tags.is_empty() {
                "-".to_string()
            } else {
                project.tags.join(", ")
            }
        ),
        format!("  {}{} ({})", icon, project.image, preview.describe()),
    ];
    if let Some(link) = &project.link {
        lines.push(format!("  {}{}", LINK, link));
    }
    if let Some(position) = project.order_index {
        lines.push(format!("  position:    {}", position));
    }
    if let Some(updated) = &project.updated_at {
        lines.push(format!("  updated:     {}", style(updated).dim()));
    }
    lines.join("\n")
}

pub fn print_project(project: &Project) {
    println!();
    println!("{}", format_project(project));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, title: &str) -> Project {
        Project {
            id: id.into(),
            title: title.into(),
            description: "desc".into(),
            tags: vec!["rust".into(), "cli".into()],
            image: "https://cdn.example.com/a.png".into(),
            link: Some("https://example.com".into()),
            media_type: MediaType::Image,
            order_index: Some(0),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_table_lists_projects_in_order() {
        let table = format_project_table(&[project("a1", "First"), project("b2", "Second")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("1"));
        assert!(lines[2].contains("First"));
        assert!(lines[3].contains("Second"));
        assert!(lines[3].contains("rust, cli"));
    }

    #[test]
    fn test_empty_table_hint() {
        assert!(format_project_table(&[]).contains("folio add"));
    }

    #[test]
    fn test_project_detail_includes_preview_and_link() {
        let detail = format_project(&project("a1", "First"));
        assert!(detail.contains("remote image"));
        assert!(detail.contains("https://example.com"));
        assert!(detail.contains("position:    0"));
    }

    #[test]
    fn test_notification_includes_description() {
        let text = format_notification(&Notification::error("Network error", "Failed to fetch"));
        assert!(text.contains("Network error"));
        assert!(text.contains("Failed to fetch"));
        let text = format_notification(&Notification::success("Saved"));
        assert!(!text.contains('\n'));
    }
}
