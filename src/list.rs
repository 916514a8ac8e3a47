//! Item list and pagination state.

use crate::types::{FeedbackItem, FeedbackPage};

/// Pagination math for one loaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
        }
    }

    pub fn from_page(result: &FeedbackPage, page_size: u32) -> Self {
        Self::new(result.page, result.page_size.unwrap_or(page_size), result.total)
    }

    /// `ceil(total / page_size)`, never less than 1
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// Short summary such as `Page 2 of 3 (45 items)`
    pub fn summary(&self) -> String {
        let noun = if self.total == 1 { "item" } else { "items" };
        format!(
            "Page {} of {} ({} {})",
            self.page,
            self.total_pages(),
            self.total,
            noun
        )
    }
}

/// A rendered page with at most one expanded item (accordion)
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    expanded: Option<u64>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<u64> {
        self.expanded
    }

    pub fn is_expanded(&self, id: u64) -> bool {
        self.expanded == Some(id)
    }

    /// Toggle `id`. Expanding one item collapses whichever was open.
    /// Returns the id that was collapsed, if any.
    pub fn toggle(&mut self, id: u64) -> Option<u64> {
        let previous = self.expanded;
        self.expanded = if previous == Some(id) { None } else { Some(id) };
        previous
    }

    /// Expand `id` whether or not it was already open
    pub fn expand(&mut self, id: u64) -> Option<u64> {
        self.expanded.replace(id).filter(|previous| *previous != id)
    }

    pub fn collapse(&mut self) -> Option<u64> {
        self.expanded.take()
    }

    /// Drop the expansion if the item is no longer on the page
    pub fn retain_visible(&mut self, items: &[FeedbackItem]) {
        if let Some(id) = self.expanded
            && !items.iter().any(|item| item.id == id)
        {
            self.expanded = None;
        }
    }
}

/// Message shown when a page has no items
pub fn empty_message(filtered: bool) -> &'static str {
    if filtered {
        "No feedback matches the current filters."
    } else {
        "No feedback yet."
    }
}
