use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions, surface};
use crate::display::{format_item_line, format_pagination};
use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::list::empty_message;
use crate::types::SortOrder;

pub struct LsOptions {
    pub filters: FilterCriteria,
    pub page: u32,
    pub sort: SortOrder,
}

/// List one page of feedback matching the filters
pub async fn cmd_ls(ctx: &AppContext, options: LsOptions, output: OutputOptions) -> Result<()> {
    options.filters.validate()?;

    let mut controller = ctx
        .controller()?
        .with_sort(options.sort)
        .with_filters(options.filters)
        .with_page(options.page);
    if let Err(e) = controller.mount().await {
        return Err(surface(&controller, e));
    }

    let result = controller.result();
    let pagination = controller.pagination();

    let text = if result.items.is_empty() {
        empty_message(!controller.filters().is_empty()).to_string()
    } else {
        let mut lines: Vec<String> = result
            .items
            .iter()
            .map(|item| {
                let assignee = item.assignee.as_deref().map(|a| controller.display_name(a));
                format_item_line(item, assignee)
            })
            .collect();
        lines.push(String::new());
        lines.push(format_pagination(&pagination));
        lines.join("\n")
    };

    let json_output = json!({
        "items": result.items,
        "page": pagination.page,
        "page_size": pagination.page_size,
        "total": pagination.total,
        "total_pages": pagination.total_pages(),
    });

    CommandOutput::new(json_output).with_text(text).print(output)
}
