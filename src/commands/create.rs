use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions, surface};
use crate::error::Result;
use crate::types::{FeedbackType, Severity};

pub struct CreateOptions {
    pub project_key: String,
    pub title: String,
    pub description: String,
    pub feedback_type: FeedbackType,
    pub severity: Severity,
    pub assignee: Option<String>,
}

/// Submit a new feedback item through the submission form
pub async fn cmd_create(
    ctx: &AppContext,
    options: CreateOptions,
    output: OutputOptions,
) -> Result<()> {
    let mut controller = ctx.controller()?;
    {
        let draft = controller.form_mut().draft_mut();
        draft.project_key = options.project_key;
        draft.title = options.title;
        draft.description = options.description;
        draft.feedback_type = options.feedback_type;
        draft.severity = options.severity;
        draft.assignee = options.assignee.unwrap_or_default();
    }

    let item = match controller.submit().await {
        Ok(item) => item,
        Err(e) => return Err(surface(&controller, e)),
    };

    let text = format!(
        "Created {} {}",
        format!("#{}", item.id).cyan(),
        item.title
    );
    CommandOutput::new(json!(item)).with_text(text).print(output)
}
