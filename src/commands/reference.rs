//! Reference data commands: `projects`, `people`, `health`.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions};
use crate::api::FeedbackApi;
use crate::display::{people_table, projects_table};
use crate::error::Result;

pub async fn cmd_projects(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let projects = ctx.client()?.list_projects().await?;
    let text = if projects.iter().any(|p| p.active) {
        projects_table(&projects)
    } else {
        "No projects configured.".dimmed().to_string()
    };
    CommandOutput::new(json!(projects)).with_text(text).print(output)
}

pub async fn cmd_people(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let people = ctx.client()?.list_people().await?;
    let text = if people.is_empty() {
        "No people found.".dimmed().to_string()
    } else {
        people_table(&people)
    };
    CommandOutput::new(json!(people)).with_text(text).print(output)
}

pub async fn cmd_health(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let client = ctx.client()?;
    let ok = client.health().await?;
    let text = if ok {
        format!("{} {}", "ok".green(), client.base_url())
    } else {
        format!("{} {}", "unhealthy".red(), client.base_url())
    };
    CommandOutput::new(json!({ "ok": ok, "base_url": client.base_url().as_str() }))
        .with_text(text)
        .print(output)
}
