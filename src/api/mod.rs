//! REST client for the feedback API.
//!
//! [`FeedbackApi`] is the seam between the UI state models and the network.
//! [`HttpClient`] implements it over reqwest; tests substitute in-memory fakes.

pub mod error;
pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Comment, FeedbackItem, FeedbackPage, FeedbackPatch, NewComment, NewFeedback, PAGE_SIZE_DEFAULT,
    Person, Project, SortOrder,
};

pub use error::ApiError;
pub use http::HttpClient;

/// Query for `GET /feedback`. Only non-empty filter fields become parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub project_key: Option<String>,
    pub status: Option<String>,
    pub feedback_type: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            project_key: None,
            status: None,
            feedback_type: None,
            search: None,
            page: 1,
            page_size: PAGE_SIZE_DEFAULT,
            sort: SortOrder::default(),
        }
    }
}

impl ListQuery {
    /// Query-string pairs in a stable order. `sort` is only sent when it
    /// differs from the server default.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let filters = [
            ("project_key", &self.project_key),
            ("status", &self.status),
            ("type", &self.feedback_type),
            ("search", &self.search),
        ];
        for (name, value) in filters {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((name, v.to_string()));
            }
        }
        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        if self.sort != SortOrder::default() {
            params.push(("sort", self.sort.as_param().to_string()));
        }
        params
    }
}

/// Operations the feedback server exposes under `/api`
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<bool>;

    /// `GET /projects`
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// `GET /people`
    async fn list_people(&self) -> Result<Vec<Person>>;

    /// `GET /feedback`
    async fn list_feedback(&self, query: &ListQuery) -> Result<FeedbackPage>;

    /// `GET /feedback/{id}`
    async fn get_feedback(&self, id: u64) -> Result<FeedbackItem>;

    /// `POST /feedback`
    async fn create_feedback(&self, record: &NewFeedback) -> Result<FeedbackItem>;

    /// `PATCH /feedback/{id}`
    async fn patch_feedback(&self, id: u64, patch: &FeedbackPatch) -> Result<FeedbackItem>;

    /// `GET /feedback/{id}/comments`
    async fn list_comments(&self, id: u64) -> Result<Vec<Comment>>;

    /// `POST /feedback/{id}/comments`
    async fn add_comment(&self, id: u64, comment: &NewComment) -> Result<Comment>;
}
