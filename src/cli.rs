use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::types::{
    FeedbackStatus, FeedbackType, Severity, VALID_SEVERITIES, VALID_STATUSES, VALID_TYPES,
};

#[derive(Parser)]
#[command(name = "lfb")]
#[command(about = "Report, browse and triage feedback")]
#[command(version)]
pub struct Cli {
    /// Act as this user for this invocation
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects feedback can be filed against
    Projects,

    /// List people who can be assigned
    People,

    /// Check that the API is reachable
    Health,

    /// List feedback, one page at a time
    Ls {
        /// Filter by project key
        #[arg(short, long)]
        project: Option<String>,

        /// Filter by type (bug, feature)
        #[arg(short = 't', long = "type", value_parser = parse_type)]
        feedback_type: Option<FeedbackType>,

        /// Filter by status (open, pending, in_progress, resolved, closed)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<FeedbackStatus>,

        /// Free-text search over title and description
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Page number (1-indexed)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Show oldest feedback first
        #[arg(long)]
        oldest_first: bool,
    },

    /// Show one item with its comments
    #[command(visible_alias = "s")]
    Show {
        /// Feedback ID
        id: u64,
    },

    /// Report a bug or request a feature
    #[command(visible_alias = "c")]
    Create {
        /// Project key
        #[arg(short, long)]
        project: String,

        /// Short summary
        #[arg(long)]
        title: String,

        /// Full description
        #[arg(short, long)]
        description: String,

        /// Type: bug, feature (default: bug)
        #[arg(short = 't', long = "type", default_value = "bug", value_parser = parse_type)]
        feedback_type: FeedbackType,

        /// Severity: low, medium, high, critical (default: medium)
        #[arg(long, default_value = "medium", value_parser = parse_severity)]
        severity: Severity,

        /// Initial assignee
        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// Change status, assignee, resolution or other fields
    Update {
        /// Feedback ID
        id: u64,

        /// New status (only the assignee may change it)
        #[arg(short, long, value_parser = parse_optional_status)]
        status: Option<String>,

        /// New assignee
        #[arg(short, long)]
        assignee: Option<String>,

        /// Resolution note (only the assignee may set it)
        #[arg(short, long)]
        resolution: Option<String>,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New severity
        #[arg(long, value_parser = parse_optional_severity)]
        severity: Option<String>,
    },

    /// List comments on an item
    Comments {
        /// Feedback ID
        id: u64,
    },

    /// Add a comment to an item
    Comment {
        /// Feedback ID
        id: u64,

        /// Comment text
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, user, page_size, timeout_secs, auth.token)
        key: String,
        /// Value to set
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (base_url, user, page_size, timeout_secs, auth.token)
        key: String,
    },
}

fn parse_type(s: &str) -> Result<FeedbackType, String> {
    s.parse()
        .map_err(|_| format!("Invalid type. Must be one of: {}", VALID_TYPES.join(", ")))
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid severity. Must be one of: {}",
            VALID_SEVERITIES.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<FeedbackStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )
    })
}

/// Accepts an empty value (dropped from the patch) or a valid status
fn parse_optional_status(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Ok(String::new());
    }
    parse_status(s).map(|status| status.to_string())
}

/// Accepts an empty value (dropped from the patch) or a valid severity
fn parse_optional_severity(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Ok(String::new());
    }
    parse_severity(s).map(|severity| severity.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "lfb", &mut io::stdout());
}
