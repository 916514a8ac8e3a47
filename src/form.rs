//! Submission form for new feedback.

use std::future::Future;

use crate::error::{FeedbackError, Result};
use crate::session::Session;
use crate::types::{FeedbackType, NewFeedback, Severity};

/// In-progress feedback record. Type and severity always carry a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub project_key: String,
    pub feedback_type: FeedbackType,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Optional initial assignee; empty means unassigned
    pub assignee: String,
}

impl FeedbackDraft {
    /// First required field that is still empty, in form order
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("project", &self.project_key),
            ("title", &self.title),
            ("description", &self.description),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Build the request body, attributing it to the session user
    pub fn to_record(&self, session: &Session) -> Result<NewFeedback> {
        if let Some(field) = self.missing_field() {
            return Err(FeedbackError::IncompleteDraft(field));
        }
        let assignee = self.assignee.trim();
        Ok(NewFeedback {
            project_key: self.project_key.trim().to_string(),
            feedback_type: self.feedback_type,
            title: self.title.clone(),
            description: self.description.clone(),
            severity: Some(self.severity),
            assignee: (!assignee.is_empty()).then(|| assignee.to_string()),
            created_by: session.user().to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct SubmissionForm {
    draft: FeedbackDraft,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FeedbackDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FeedbackDraft {
        &mut self.draft
    }

    /// Submit is enabled only when project, title and description are filled in
    pub fn is_submittable(&self) -> bool {
        self.draft.missing_field().is_none()
    }

    pub fn reset(&mut self) {
        self.draft = FeedbackDraft::default();
    }

    /// Hand the draft to `handler`, then reset the form whatever the outcome.
    ///
    /// An incomplete draft never reaches the handler and is left untouched.
    pub async fn submit<F, Fut, T>(&mut self, session: &Session, handler: F) -> Result<T>
    where
        F: FnOnce(NewFeedback) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let record = self.draft.to_record(session)?;
        let result = handler(record).await;
        self.reset();
        result
    }
}
