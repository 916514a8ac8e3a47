use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions, surface};
use crate::display::{format_comment_thread, format_item_detail};
use crate::error::Result;

/// Show one item with its comment thread
pub async fn cmd_show(ctx: &AppContext, id: u64, output: OutputOptions) -> Result<()> {
    let mut controller = ctx.controller()?;
    if let Err(e) = controller.toggle_item(id).await {
        return Err(surface(&controller, e));
    }
    let Some(detail) = controller.detail() else {
        return Ok(());
    };

    let item = detail.item();
    let text = format!(
        "{}\n\n{}",
        format_item_detail(item, None),
        format_comment_thread(detail.comments())
    );

    CommandOutput::new(json!({
        "item": item,
        "comments": detail.comments(),
    }))
    .with_text(text)
    .print(output)
}
