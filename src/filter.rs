//! Filter bar state.
//!
//! The criteria object is owned by the page controller. Each control
//! produces a complete replacement object with one field changed; "clear"
//! produces the all-empty object. An empty string means "no filter".

use std::fmt;

use crate::api::ListQuery;
use crate::error::Result;
use crate::types::{FeedbackStatus, FeedbackType, SortOrder};

/// One control of the filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Project,
    Type,
    Status,
    Search,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub project_key: String,
    pub feedback_type: String,
    pub status: String,
    pub search: String,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl FilterCriteria {
    /// A copy of these criteria with one field replaced
    pub fn with(&self, field: FilterField, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        match field {
            FilterField::Project => next.project_key = value,
            FilterField::Type => next.feedback_type = value,
            FilterField::Status => next.status = value,
            FilterField::Search => next.search = value,
        }
        next
    }

    /// The all-empty criteria produced by the "clear" action
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }

    /// Fields that actually constrain the list, as `(name, value)` pairs
    pub fn active(&self) -> Vec<(FilterField, &str)> {
        [
            (FilterField::Project, self.project_key.as_str()),
            (FilterField::Type, self.feedback_type.as_str()),
            (FilterField::Status, self.status.as_str()),
            (FilterField::Search, self.search.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect()
    }

    /// Check that the type and status fields, when set, name known values
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = non_empty(&self.feedback_type) {
            t.parse::<FeedbackType>()?;
        }
        if let Some(s) = non_empty(&self.status) {
            s.parse::<FeedbackStatus>()?;
        }
        Ok(())
    }

    /// Build the list request for a page. Empty fields are left out.
    pub fn to_query(&self, page: u32, page_size: u32, sort: SortOrder) -> ListQuery {
        ListQuery {
            project_key: non_empty(&self.project_key),
            status: non_empty(&self.status),
            feedback_type: non_empty(&self.feedback_type),
            search: non_empty(&self.search),
            page: page.max(1),
            page_size,
            sort,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterField::Project => "project",
            FilterField::Type => "type",
            FilterField::Status => "status",
            FilterField::Search => "search",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_replaces_single_field() {
        let base = FilterCriteria::default().with(FilterField::Project, "nfrfconnect");
        let next = base.with(FilterField::Status, "open");
        assert_eq!(base.status, "");
        assert_eq!(next.project_key, "nfrfconnect");
        assert_eq!(next.status, "open");
    }

    #[test]
    fn test_cleared_resets_everything() {
        let criteria = FilterCriteria::default()
            .with(FilterField::Project, "p")
            .with(FilterField::Type, "bug")
            .with(FilterField::Search, "crash");
        assert!(!criteria.is_empty());
        assert_eq!(FilterCriteria::cleared(), FilterCriteria::default());
        assert!(FilterCriteria::cleared().is_empty());
    }

    #[test]
    fn test_empty_criteria_query_has_only_paging() {
        let query = FilterCriteria::default().to_query(1, 20, SortOrder::default());
        let names: Vec<_> = query.to_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["page", "page_size"]);
    }

    #[test]
    fn test_whitespace_fields_are_dropped() {
        let criteria = FilterCriteria {
            search: "   ".to_string(),
            status: "open".to_string(),
            ..Default::default()
        };
        let query = criteria.to_query(2, 20, SortOrder::default());
        assert_eq!(query.search, None);
        assert_eq!(query.status.as_deref(), Some("open"));
        assert_eq!(criteria.active(), vec![(FilterField::Status, "open")]);
    }

    #[test]
    fn test_page_zero_is_raised_to_one() {
        let query = FilterCriteria::default().to_query(0, 20, SortOrder::default());
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_validate_rejects_unknown_status() {
        let criteria = FilterCriteria::default().with(FilterField::Status, "done");
        assert!(criteria.validate().is_err());
        let criteria = FilterCriteria::default().with(FilterField::Type, "Feature");
        assert!(criteria.validate().is_ok());
    }
}
