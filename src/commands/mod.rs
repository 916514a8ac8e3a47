mod comment;
mod config;
mod create;
mod ls;
mod reference;
mod show;
mod update;

pub use comment::{cmd_comment, cmd_comments};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use create::{CreateOptions, cmd_create};
pub use ls::{LsOptions, cmd_ls};
pub use reference::{cmd_health, cmd_people, cmd_projects};
pub use show::cmd_show;
pub use update::{UpdateOptions, cmd_update};

use serde_json::Value;

use crate::api::HttpClient;
use crate::config::Config;
use crate::controller::PageController;
use crate::error::{FeedbackError, Result};
use crate::session::Session;

/// Output mode shared by all commands
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

/// A command result with a JSON form and an optional human-readable form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else if let Some(text) = self.text {
            println!("{text}");
        } else {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        }
        Ok(())
    }
}

/// Loaded configuration plus the acting user for one invocation
pub struct AppContext {
    pub config: Config,
    pub session: Session,
}

impl AppContext {
    pub fn load(user_override: Option<&str>) -> Result<Self> {
        let config = Config::load()?;
        let session = Session::resolve(&config, user_override);
        tracing::debug!("acting as {}", session.user());
        Ok(Self { config, session })
    }

    pub fn client(&self) -> Result<HttpClient> {
        HttpClient::from_config(&self.config)
    }

    pub fn controller(&self) -> Result<PageController<HttpClient>> {
        Ok(PageController::new(
            self.client()?,
            self.session.clone(),
            self.config.page_size(),
        ))
    }
}

/// Replace a network failure with the controller's fixed user-facing
/// message. Local validation errors pass through unchanged.
fn surface<A>(controller: &PageController<A>, error: FeedbackError) -> FeedbackError
where
    A: crate::api::FeedbackApi,
{
    match controller.error() {
        Some(message) if error.is_remote() => FeedbackError::Failed(message.to_string()),
        _ => error,
    }
}
