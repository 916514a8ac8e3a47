pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod detail;
pub mod display;
pub mod error;
pub mod filter;
pub mod form;
pub mod list;
pub mod session;
pub mod types;

pub use api::{ApiError, FeedbackApi, HttpClient, ListQuery};
pub use config::Config;
pub use controller::{LoadState, LoadTicket, PageController};
pub use detail::{ItemDetail, PatchDraft};
pub use error::{FeedbackError, Result};
pub use filter::{FilterCriteria, FilterField};
pub use form::{FeedbackDraft, SubmissionForm};
pub use list::{ItemList, Pagination};
pub use session::Session;
pub use types::{
    Comment, FeedbackItem, FeedbackPage, FeedbackPatch, FeedbackStatus, FeedbackType,
    NewComment, NewFeedback, Person, Project, Severity, SortOrder,
};
