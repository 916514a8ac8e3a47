//! Page controller: owns top-level state and orchestrates every load.
//!
//! The load cycle is `Idle -> Loading -> Loaded | Errored`. `Loaded` and
//! `Errored` hold until the next load begins and the state never returns
//! to `Idle`. Each list load is tagged with a [`LoadTicket`]; only the
//! latest ticket may write the result, so a slow, superseded response never
//! overwrites newer state.
//!
//! Failed mutations are logged with their detail and surfaced to the user as
//! one of the fixed `FAILED_*` messages.

use futures::future::join;

use crate::api::{FeedbackApi, ListQuery};
use crate::detail::ItemDetail;
use crate::error::{FeedbackError, Result};
use crate::filter::FilterCriteria;
use crate::form::SubmissionForm;
use crate::list::{ItemList, Pagination};
use crate::session::Session;
use crate::types::{Comment, FeedbackItem, FeedbackPage, Person, Project, SortOrder};

pub const FAILED_LOAD: &str = "Failed to load feedback. Please try again.";
pub const FAILED_SUBMIT: &str = "Failed to submit feedback. Please try again.";
pub const FAILED_UPDATE: &str = "Failed to update feedback. Please try again.";
pub const FAILED_COMMENT: &str = "Failed to add comment. Please try again.";
pub const FAILED_COMMENTS: &str = "Failed to load comments. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// Handle for one issued list load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    query: ListQuery,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

pub struct PageController<A> {
    api: A,
    session: Session,
    page_size: u32,
    sort: SortOrder,
    projects: Vec<Project>,
    people: Vec<Person>,
    filters: FilterCriteria,
    page: u32,
    result: FeedbackPage,
    state: LoadState,
    error: Option<String>,
    list: ItemList,
    detail: Option<ItemDetail>,
    form: SubmissionForm,
    issued: u64,
}

impl<A: FeedbackApi> PageController<A> {
    pub fn new(api: A, session: Session, page_size: u32) -> Self {
        Self {
            api,
            session,
            page_size: page_size.max(1),
            sort: SortOrder::default(),
            projects: Vec::new(),
            people: Vec::new(),
            filters: FilterCriteria::default(),
            page: 1,
            result: FeedbackPage::empty(),
            state: LoadState::Idle,
            error: None,
            list: ItemList::new(),
            detail: None,
            form: SubmissionForm::new(),
            issued: 0,
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Start from these filters instead of the empty ones
    pub fn with_filters(mut self, filters: FilterCriteria) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn result(&self) -> &FeedbackPage {
        &self.result
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// User-facing error message from the last failed action
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_page(&self.result, self.page_size)
    }

    pub fn list(&self) -> &ItemList {
        &self.list
    }

    pub fn detail(&self) -> Option<&ItemDetail> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut ItemDetail> {
        self.detail.as_mut()
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.form
    }

    /// Display name for a username, falling back to the username itself
    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        self.people
            .iter()
            .find(|p| p.username == username)
            .map(|p| p.name.as_str())
            .unwrap_or(username)
    }

    /// Load reference data, then the first page. A failed reference load
    /// leaves the project and people lists empty instead of failing.
    pub async fn mount(&mut self) -> Result<()> {
        let (projects, people) = join(self.api.list_projects(), self.api.list_people()).await;
        match projects {
            Ok(projects) => self.projects = projects,
            Err(e) => tracing::warn!("Failed to load projects: {e}"),
        }
        match people {
            Ok(people) => self.people = people,
            Err(e) => tracing::warn!("Failed to load people: {e}"),
        }
        self.reload().await
    }

    /// Replace the filters, return to page 1 and reload
    pub async fn set_filters(&mut self, filters: FilterCriteria) -> Result<()> {
        self.filters = filters;
        self.page = 1;
        self.reload().await
    }

    pub async fn clear_filters(&mut self) -> Result<()> {
        self.set_filters(FilterCriteria::cleared()).await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<()> {
        self.page = page.max(1);
        self.reload().await
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        match self.pagination().next() {
            Some(page) => self.set_page(page).await.map(|_| true),
            None => Ok(false),
        }
    }

    pub async fn previous_page(&mut self) -> Result<bool> {
        match self.pagination().previous() {
            Some(page) => self.set_page(page).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Issue a list load for the current filters and page
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            seq: self.issued,
            query: self.filters.to_query(self.page, self.page_size, self.sort),
        }
    }

    /// Apply a finished load. Stale tickets are dropped and return `Ok(false)`.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<FeedbackPage>) -> Result<bool> {
        if ticket.seq != self.issued {
            tracing::debug!(
                "dropping stale load #{} (latest is #{})",
                ticket.seq,
                self.issued
            );
            return Ok(false);
        }

        match result {
            Ok(page) => {
                self.list.retain_visible(&page.items);
                if self.list.expanded().is_none() {
                    self.detail = None;
                }
                if let Some(detail) = self.detail.as_mut()
                    && let Some(item) = page.items.iter().find(|i| i.id == detail.item().id)
                {
                    detail.set_item(item.clone());
                }
                self.result = page;
                self.state = LoadState::Loaded;
                self.error = None;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Failed to load feedback: {e}");
                self.state = LoadState::Errored(FAILED_LOAD.to_string());
                self.error = Some(FAILED_LOAD.to_string());
                Err(e)
            }
        }
    }

    pub async fn reload(&mut self) -> Result<()> {
        let ticket = self.begin_load();
        let result = self.api.list_feedback(&ticket.query).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Submit the form. On success the list returns to page 1 and reloads.
    pub async fn submit(&mut self) -> Result<FeedbackItem> {
        let api = &self.api;
        let created = self
            .form
            .submit(&self.session, |record| async move {
                api.create_feedback(&record).await
            })
            .await;

        match created {
            Ok(item) => {
                tracing::info!("Created feedback #{} by {}", item.id, item.created_by);
                self.page = 1;
                // A failed reload is already surfaced through `error()`
                let _ = self.reload().await;
                Ok(item)
            }
            Err(e) => Err(self.record_failure(e, FAILED_SUBMIT)),
        }
    }

    /// Expand `id`, collapsing any other item, and fetch its comments.
    /// Toggling the expanded item collapses it. Returns whether `id` is now expanded.
    pub async fn toggle_item(&mut self, id: u64) -> Result<bool> {
        self.list.toggle(id);
        if let Some(mut previous) = self.detail.take() {
            previous.collapse();
        }
        if !self.list.is_expanded(id) {
            return Ok(false);
        }

        let mut detail = ItemDetail::new(self.resolve_item(id).await?);
        let loaded = detail.load_comments(&self.api).await;
        self.detail = Some(detail);
        if let Err(e) = loaded {
            return Err(self.record_failure(e, FAILED_COMMENTS));
        }
        Ok(true)
    }

    /// Expand `id` for editing without fetching its thread. An already
    /// expanded `id` is left as it is.
    pub async fn open_item(&mut self, id: u64) -> Result<()> {
        if self.list.is_expanded(id) && self.detail.is_some() {
            return Ok(());
        }
        if let Some(mut previous) = self.detail.take() {
            previous.collapse();
        }
        self.list.expand(id);

        let item = self.resolve_item(id).await?;
        self.detail = Some(ItemDetail::new(item));
        Ok(())
    }

    /// Find `id` on the loaded page, or fetch it. Collapses the list on failure.
    async fn resolve_item(&mut self, id: u64) -> Result<FeedbackItem> {
        if let Some(item) = self.result.items.iter().find(|i| i.id == id) {
            return Ok(item.clone());
        }
        match self.api.get_feedback(id).await {
            Ok(item) => Ok(item),
            Err(e) => {
                self.list.collapse();
                if matches!(e, FeedbackError::NotFound(_)) {
                    return Err(e);
                }
                Err(self.record_failure(e, FAILED_LOAD))
            }
        }
    }

    /// Re-fetch the expanded item's thread. No-op when nothing is expanded.
    pub async fn reload_comments(&mut self) -> Result<()> {
        let Some(detail) = self.detail.as_mut() else {
            return Ok(());
        };
        match detail.load_comments(&self.api).await {
            Ok(_) => Ok(()),
            Err(e) => Err(self.record_failure(e, FAILED_COMMENTS)),
        }
    }

    /// Send the expanded item's patch draft, then reload the page
    pub async fn update_item(&mut self) -> Result<FeedbackItem> {
        let Some(detail) = self.detail.as_mut() else {
            return Err(FeedbackError::EmptyPatch);
        };
        match detail.submit_update(&self.api, &self.session).await {
            Ok(item) => {
                tracing::info!("Updated feedback #{} by {}", item.id, self.session.user());
                let _ = self.reload().await;
                Ok(item)
            }
            Err(e) => Err(self.record_failure(e, FAILED_UPDATE)),
        }
    }

    /// Post the expanded item's comment input
    pub async fn add_comment(&mut self) -> Result<Comment> {
        let Some(detail) = self.detail.as_mut() else {
            return Err(FeedbackError::EmptyComment);
        };
        match detail.submit_comment(&self.api, &self.session).await {
            Ok(comment) => {
                tracing::info!("Added comment #{} by {}", comment.id, comment.created_by);
                Ok(comment)
            }
            Err(e) => Err(self.record_failure(e, FAILED_COMMENT)),
        }
    }

    /// Fetch one item and swap it into the loaded page and detail
    pub async fn refresh_item(&mut self, id: u64) -> Result<FeedbackItem> {
        let item = self.api.get_feedback(id).await?;
        if let Some(slot) = self.result.items.iter_mut().find(|i| i.id == id) {
            *slot = item.clone();
        }
        if let Some(detail) = self.detail.as_mut()
            && detail.item().id == id
        {
            detail.set_item(item.clone());
        }
        Ok(item)
    }

    /// Network failures become the fixed message; local validation errors
    /// are returned as-is without touching the message.
    fn record_failure(&mut self, error: FeedbackError, message: &str) -> FeedbackError {
        if error.is_remote() {
            tracing::warn!("{message} ({error})");
            self.error = Some(message.to_string());
        }
        error
    }
}
