use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions, surface};
use crate::detail::PatchDraft;
use crate::display::format_status_colored;
use crate::error::Result;

pub struct UpdateOptions {
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub resolution: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
}

impl UpdateOptions {
    fn into_draft(self) -> PatchDraft {
        PatchDraft {
            status: self.status.unwrap_or_default(),
            assignee: self.assignee.unwrap_or_default(),
            resolution: self.resolution.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            severity: self.severity.unwrap_or_default(),
        }
    }
}

/// Patch an item. Empty fields are dropped and the assignee rule is
/// checked before anything is sent.
pub async fn cmd_update(
    ctx: &AppContext,
    id: u64,
    options: UpdateOptions,
    output: OutputOptions,
) -> Result<()> {
    let mut controller = ctx.controller()?;
    if let Err(e) = controller.open_item(id).await {
        return Err(surface(&controller, e));
    }
    if let Some(detail) = controller.detail_mut() {
        *detail.patch_mut() = options.into_draft();
    }

    let item = match controller.update_item().await {
        Ok(item) => item,
        Err(e) => return Err(surface(&controller, e)),
    };

    let text = format!(
        "Updated {} {} {}",
        format!("#{}", item.id).cyan(),
        format_status_colored(item.status),
        item.title
    );
    CommandOutput::new(json!(item)).with_text(text).print(output)
}
