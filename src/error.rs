use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid feedback type '{0}'")]
    InvalidType(String),

    #[error("invalid severity '{0}'")]
    InvalidSeverity(String),

    #[error("invalid sort order '{0}'")]
    InvalidSort(String),

    #[error("nothing to update: every patch field is empty")]
    EmptyPatch,

    #[error("comment body cannot be empty")]
    EmptyComment,

    #[error("draft is incomplete: {0} is required")]
    IncompleteDraft(&'static str),

    #[error("only the assignee ({assignee}) may change status or resolution, not '{user}'")]
    Forbidden { user: String, assignee: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A failure already reduced to its user-facing message
    #[error("{0}")]
    Failed(String),
}

impl FeedbackError {
    /// Whether this error came from the network layer rather than local validation
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            FeedbackError::Api { .. } | FeedbackError::Transport(_) | FeedbackError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
