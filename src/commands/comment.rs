use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions, surface};
use crate::display::format_comment_thread;
use crate::error::Result;

/// List an item's comments
pub async fn cmd_comments(ctx: &AppContext, id: u64, output: OutputOptions) -> Result<()> {
    let mut controller = ctx.controller()?;
    if let Err(e) = controller.toggle_item(id).await {
        return Err(surface(&controller, e));
    }
    let comments = controller
        .detail()
        .map(|d| d.comments().to_vec())
        .unwrap_or_default();

    let text = format_comment_thread(&comments);
    CommandOutput::new(json!(comments)).with_text(text).print(output)
}

/// Add a comment to an item. Blank text is rejected before any request.
pub async fn cmd_comment(
    ctx: &AppContext,
    id: u64,
    text: &str,
    output: OutputOptions,
) -> Result<()> {
    if text.trim().is_empty() {
        return Err(crate::error::FeedbackError::EmptyComment);
    }

    let mut controller = ctx.controller()?;
    if let Err(e) = controller.open_item(id).await {
        return Err(surface(&controller, e));
    }
    if let Some(detail) = controller.detail_mut() {
        detail.set_comment_input(text);
    }

    let comment = match controller.add_comment().await {
        Ok(comment) => comment,
        Err(e) => return Err(surface(&controller, e)),
    };

    let text = format!(
        "Added comment {} to {}",
        format!("#{}", comment.id).cyan(),
        format!("#{id}").cyan()
    );
    CommandOutput::new(json!(comment)).with_text(text).print(output)
}
