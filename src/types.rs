use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use unicase::UniCase;

use crate::error::FeedbackError;

/// Server default for `page_size` when none is sent
pub const PAGE_SIZE_DEFAULT: u32 = 20;

/// Server clamps any larger `page_size` down to this
pub const PAGE_SIZE_MAX: u32 = 100;

/// Case-insensitive lookup of `s` among `(name, value)` pairs
fn lookup<T: Copy>(s: &str, table: &[(&str, T)]) -> Option<T> {
    let needle = UniCase::new(s.trim());
    table
        .iter()
        .find(|(name, _)| UniCase::new(*name) == needle)
        .map(|(_, value)| *value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    #[default]
    Bug,
    Feature,
}

impl FeedbackType {
    const TABLE: &'static [(&'static str, FeedbackType)] =
        &[("bug", FeedbackType::Bug), ("feature", FeedbackType::Feature)];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Bug => "bug",
            FeedbackType::Feature => "feature",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackType {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s, Self::TABLE).ok_or_else(|| FeedbackError::InvalidType(s.to_string()))
    }
}

pub const VALID_TYPES: &[&str] = &["bug", "feature"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    const TABLE: &'static [(&'static str, Severity)] = &[
        ("low", Severity::Low),
        ("medium", Severity::Medium),
        ("high", Severity::High),
        ("critical", Severity::Critical),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s, Self::TABLE).ok_or_else(|| FeedbackError::InvalidSeverity(s.to_string()))
    }
}

pub const VALID_SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Open,
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl FeedbackStatus {
    const TABLE: &'static [(&'static str, FeedbackStatus)] = &[
        ("open", FeedbackStatus::Open),
        ("pending", FeedbackStatus::Pending),
        ("in_progress", FeedbackStatus::InProgress),
        ("resolved", FeedbackStatus::Resolved),
        ("closed", FeedbackStatus::Closed),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Open => "open",
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::InProgress => "in_progress",
            FeedbackStatus::Resolved => "resolved",
            FeedbackStatus::Closed => "closed",
        }
    }

    /// Resolved and closed items no longer need attention
    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedbackStatus::Resolved | FeedbackStatus::Closed)
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackStatus {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s, Self::TABLE).ok_or_else(|| FeedbackError::InvalidStatus(s.to_string()))
    }
}

pub const VALID_STATUSES: &[&str] = &["open", "pending", "in_progress", "resolved", "closed"];

/// Ordering of the list endpoint, sent as the `sort` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "-created_at",
            SortOrder::OldestFirst => "created_at",
        }
    }
}

impl FromStr for SortOrder {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-created_at" | "newest" => Ok(SortOrder::NewestFirst),
            "created_at" | "oldest" => Ok(SortOrder::OldestFirst),
            other => Err(FeedbackError::InvalidSort(other.to_string())),
        }
    }
}

/// A bug or feature report as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: u64,
    pub project_key: String,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub status: FeedbackStatus,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    pub created_by: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FeedbackItem {
    /// Whether `username` is the current assignee of this item
    pub fn is_assigned_to(&self, username: &str) -> bool {
        self.assignee.as_deref() == Some(username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<u64>,
    pub body: String,
    pub created_by: String,
    pub created_at: String,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub username: String,
    pub name: String,
}

/// One page of list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPage {
    pub items: Vec<FeedbackItem>,
    pub page: u32,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl FeedbackPage {
    /// An empty first page, used before anything has loaded
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total: 0,
            page_size: None,
        }
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub project_key: String,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub created_by: String,
}

/// Body of `PATCH /feedback/{id}`. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FeedbackStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub updated_by: String,
}

impl FeedbackPatch {
    /// True when no field besides `updated_by` is set
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.assignee.is_none()
            && self.resolution.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
    }

    /// True when the patch changes status or resolution
    pub fn touches_workflow(&self) -> bool {
        self.status.is_some() || self.resolution.is_some()
    }
}

/// Body of `POST /feedback/{id}/comments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub body: String,
    pub created_by: String,
}
