//! Terminal rendering of feedback items, comments and reference data.

use jiff::Timestamp;
use jiff::civil::DateTime;
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::list::Pagination;
use crate::types::{Comment, FeedbackItem, FeedbackStatus, Person, Project, Severity};

pub fn format_status_colored(status: FeedbackStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        FeedbackStatus::Open => badge.yellow().to_string(),
        FeedbackStatus::Pending => badge.magenta().to_string(),
        FeedbackStatus::InProgress => badge.cyan().to_string(),
        FeedbackStatus::Resolved => badge.green().to_string(),
        FeedbackStatus::Closed => badge.dimmed().to_string(),
    }
}

pub fn format_severity_colored(severity: Option<Severity>) -> String {
    paint_severity(severity, severity.map_or("-", |s| s.as_str()))
}

/// Color already-laid-out text so escape codes never count toward padding
fn paint_severity(severity: Option<Severity>, text: &str) -> String {
    match severity {
        Some(Severity::Critical) => text.red().bold().to_string(),
        Some(Severity::High) => text.red().to_string(),
        Some(Severity::Medium) => text.yellow().to_string(),
        Some(Severity::Low) | None => text.dimmed().to_string(),
    }
}

/// Render a server timestamp as `YYYY-MM-DD HH:MM`, or verbatim if unparseable.
/// Naive datetimes without an offset are shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return ts.strftime("%Y-%m-%d %H:%M").to_string();
    }
    match raw.parse::<DateTime>() {
        Ok(dt) => dt.strftime("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Single-line summary used by `ls`
pub fn format_item_line(item: &FeedbackItem, assignee_name: Option<&str>) -> String {
    let id = format!("#{:<5}", item.id);
    let assignee = match assignee_name {
        Some(name) => format!(" @{name}"),
        None => String::new(),
    };
    let severity = format!("{:<8}", item.severity.map_or("-", |s| s.as_str()));
    let title = if item.status.is_terminal() {
        item.title.dimmed().to_string()
    } else {
        item.title.clone()
    };
    format!(
        "{} {} {:<7} {} {} - {}{}",
        id.cyan(),
        format_status_colored(item.status),
        item.feedback_type.as_str(),
        paint_severity(item.severity, &severity),
        item.project_key.dimmed(),
        title,
        assignee.blue()
    )
}

/// Multi-line view used by `show`
pub fn format_item_detail(item: &FeedbackItem, assignee_name: Option<&str>) -> String {
    let mut out = format!(
        "{} {}\n",
        format!("#{}", item.id).cyan().bold(),
        item.title.bold()
    );
    out.push_str(&format!(
        "{} {}  {}  {}\n",
        format_status_colored(item.status),
        item.feedback_type,
        format_severity_colored(item.severity),
        item.project_key.dimmed()
    ));
    out.push_str(&format!(
        "Reported by {} on {}\n",
        item.created_by,
        format_timestamp(&item.created_at)
    ));
    match (item.assignee.as_deref(), assignee_name) {
        (Some(username), Some(name)) if name != username => {
            out.push_str(&format!("Assignee: {name} ({username})\n"));
        }
        (Some(username), _) => out.push_str(&format!("Assignee: {username}\n")),
        (None, _) => out.push_str(&format!("Assignee: {}\n", "unassigned".dimmed())),
    }
    if let Some(resolution) = item.resolution.as_deref().filter(|r| !r.is_empty()) {
        out.push_str(&format!("Resolution: {resolution}\n"));
    }
    out.push('\n');
    out.push_str(&item.description);
    out
}

pub fn format_comment(comment: &Comment) -> String {
    format!(
        "{} {}\n  {}",
        comment.created_by.bold(),
        format_timestamp(&comment.created_at).dimmed(),
        comment.body.replace('\n', "\n  ")
    )
}

pub fn format_comment_thread(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments yet.".dimmed().to_string();
    }
    comments
        .iter()
        .map(format_comment)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_pagination(pagination: &Pagination) -> String {
    let mut hints = Vec::new();
    if let Some(prev) = pagination.previous() {
        hints.push(format!("--page {prev} for previous"));
    }
    if let Some(next) = pagination.next() {
        hints.push(format!("--page {next} for next"));
    }
    if hints.is_empty() {
        pagination.summary()
    } else {
        format!("{}  {}", pagination.summary(), hints.join(", ").dimmed())
    }
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
}

pub fn projects_table(projects: &[Project]) -> String {
    let rows = projects.iter().filter(|p| p.active).map(|p| ProjectRow {
        key: p.key.clone(),
        name: p.name.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn people_table(people: &[Person]) -> String {
    let rows = people.iter().map(|p| PersonRow {
        username: p.username.clone(),
        name: p.name.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}
