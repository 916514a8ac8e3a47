//! Item detail and inline editor.
//!
//! Holds one expanded feedback item, its comment thread, a patch draft and a
//! comment input. Comment loads are sequenced: every load takes a ticket and
//! only the most recently issued ticket may write the thread.

use crate::api::FeedbackApi;
use crate::error::{FeedbackError, Result};
use crate::session::Session;
use crate::types::{Comment, FeedbackItem, FeedbackPatch, FeedbackStatus, NewComment, Severity};

/// Editable fields of an item as raw input. Empty means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchDraft {
    pub status: String,
    pub assignee: String,
    pub resolution: String,
    pub title: String,
    pub description: String,
    pub severity: String,
}

fn keep(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Free text keeps its surrounding whitespace once it is known to be non-blank
fn keep_text(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

impl PatchDraft {
    /// The clean patch: empty fields removed, the rest parsed and
    /// attributed to the session user.
    pub fn clean(&self, session: &Session) -> Result<FeedbackPatch> {
        Ok(FeedbackPatch {
            status: keep(&self.status)
                .map(|s| s.parse::<FeedbackStatus>())
                .transpose()?,
            assignee: keep(&self.assignee),
            resolution: keep_text(&self.resolution),
            title: keep_text(&self.title),
            description: keep_text(&self.description),
            severity: keep(&self.severity)
                .map(|s| s.parse::<Severity>())
                .transpose()?,
            updated_by: session.user().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.status,
            &self.assignee,
            &self.resolution,
            &self.title,
            &self.description,
            &self.severity,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}

/// Status and resolution changes are reserved for the item's current
/// assignee. Reassignment and the other fields are open to everyone.
pub fn check_permission(item: &FeedbackItem, patch: &FeedbackPatch, session: &Session) -> Result<()> {
    if patch.touches_workflow() && !item.is_assigned_to(session.user()) {
        return Err(FeedbackError::Forbidden {
            user: session.user().to_string(),
            assignee: item.assignee.clone().unwrap_or_else(|| "nobody".to_string()),
        });
    }
    Ok(())
}

/// Validate a draft against an item: non-empty, parseable, permitted.
/// Returns the patch that would be sent.
pub fn prepare_patch(item: &FeedbackItem, draft: &PatchDraft, session: &Session) -> Result<FeedbackPatch> {
    let patch = draft.clean(session)?;
    if patch.is_empty() {
        return Err(FeedbackError::EmptyPatch);
    }
    check_permission(item, &patch, session)?;
    Ok(patch)
}

/// Ticket for one comment load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentTicket {
    seq: u64,
    item_id: u64,
}

#[derive(Debug, Clone)]
pub struct ItemDetail {
    item: FeedbackItem,
    comments: Vec<Comment>,
    comments_loaded: bool,
    patch: PatchDraft,
    comment_input: String,
    comment_seq: u64,
}

impl ItemDetail {
    pub fn new(item: FeedbackItem) -> Self {
        Self {
            item,
            comments: Vec::new(),
            comments_loaded: false,
            patch: PatchDraft::default(),
            comment_input: String::new(),
            comment_seq: 0,
        }
    }

    pub fn item(&self) -> &FeedbackItem {
        &self.item
    }

    /// Replace the item after a reload, keeping thread and drafts
    pub fn set_item(&mut self, item: FeedbackItem) {
        self.item = item;
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comments_loaded(&self) -> bool {
        self.comments_loaded
    }

    pub fn patch(&self) -> &PatchDraft {
        &self.patch
    }

    pub fn patch_mut(&mut self) -> &mut PatchDraft {
        &mut self.patch
    }

    pub fn comment_input(&self) -> &str {
        &self.comment_input
    }

    pub fn set_comment_input(&mut self, text: impl Into<String>) {
        self.comment_input = text.into();
    }

    /// Discard the patch draft and invalidate in-flight comment loads
    pub fn collapse(&mut self) {
        self.patch = PatchDraft::default();
        self.comment_seq += 1;
    }

    /// The update button state: enabled only for a non-empty, permitted patch
    pub fn update_enabled(&self, session: &Session) -> bool {
        prepare_patch(&self.item, &self.patch, session).is_ok()
    }

    pub fn begin_comment_load(&mut self) -> CommentTicket {
        self.comment_seq += 1;
        CommentTicket {
            seq: self.comment_seq,
            item_id: self.item.id,
        }
    }

    /// Apply a finished comment load. Returns `Ok(false)` when the ticket
    /// was superseded and the result was dropped.
    pub fn finish_comment_load(
        &mut self,
        ticket: CommentTicket,
        result: Result<Vec<Comment>>,
    ) -> Result<bool> {
        if ticket.seq != self.comment_seq || ticket.item_id != self.item.id {
            tracing::debug!(
                "dropping stale comment load #{} for item {}",
                ticket.seq,
                ticket.item_id
            );
            return Ok(false);
        }
        self.comments = result?;
        self.comments_loaded = true;
        Ok(true)
    }

    pub async fn load_comments<A: FeedbackApi + ?Sized>(&mut self, api: &A) -> Result<bool> {
        let ticket = self.begin_comment_load();
        let result = api.list_comments(ticket.item_id).await;
        self.finish_comment_load(ticket, result)
    }

    /// Send the patch draft. On success the item is replaced by the server's
    /// copy and the draft is cleared. Invalid drafts never reach the network.
    pub async fn submit_update<A: FeedbackApi + ?Sized>(
        &mut self,
        api: &A,
        session: &Session,
    ) -> Result<FeedbackItem> {
        let patch = prepare_patch(&self.item, &self.patch, session)?;
        let updated = api.patch_feedback(self.item.id, &patch).await?;
        self.item = updated.clone();
        self.patch = PatchDraft::default();
        Ok(updated)
    }

    /// Post the comment input. Blank input is rejected without a request.
    /// The input is cleared once sent and the server's comment is appended
    /// to the thread when the write is acknowledged.
    pub async fn submit_comment<A: FeedbackApi + ?Sized>(
        &mut self,
        api: &A,
        session: &Session,
    ) -> Result<Comment> {
        let body = self.comment_input.trim().to_string();
        if body.is_empty() {
            return Err(FeedbackError::EmptyComment);
        }
        self.comment_input.clear();

        let comment = api
            .add_comment(
                self.item.id,
                &NewComment {
                    body,
                    created_by: session.user().to_string(),
                },
            )
            .await?;

        // A newer load issued while posting already includes this comment
        if !self.comments.iter().any(|c| c.id == comment.id) {
            self.comments.push(comment.clone());
        }
        Ok(comment)
    }
}
