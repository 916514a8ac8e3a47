//! reqwest-backed implementation of [`FeedbackApi`].
//!
//! No retries and no caching. The request timeout comes from the config
//! (`timeout_secs`, 0 disables it). An optional bearer token is kept in a
//! [`SecretBox`] so it never shows up in `Debug` output.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ensure_success;
use super::{FeedbackApi, ListQuery};
use crate::config::Config;
use crate::error::{FeedbackError, Result};
use crate::types::{
    Comment, FeedbackItem, FeedbackPage, FeedbackPatch, NewComment, NewFeedback, Person, Project,
};

#[derive(Deserialize)]
struct Health {
    ok: bool,
}

pub struct HttpClient {
    client: Client,
    base: Url,
    token: Option<SecretBox<String>>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base", &self.base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpClient {
    /// Create a client from configuration (base URL, timeout, token)
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::with_timeout(&config.base_url(), config.timeout())?;
        client.token = config.token().map(|t| SecretBox::new(Box::new(t)));
        Ok(client)
    }

    /// Create a client for `base_url` with no timeout and no token
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(FeedbackError::Config(format!(
                "base URL '{base_url}' cannot have paths appended"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
            token: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = ensure_success(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl FeedbackApi for HttpClient {
    async fn health(&self) -> Result<bool> {
        let url = self.endpoint(&["health"]);
        let health: Health = self.send_json(self.request(Method::GET, url)).await?;
        Ok(health.ok)
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(&["projects"]);
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn list_people(&self) -> Result<Vec<Person>> {
        let url = self.endpoint(&["people"]);
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn list_feedback(&self, query: &ListQuery) -> Result<FeedbackPage> {
        let mut url = self.endpoint(&["feedback"]);
        url.query_pairs_mut().extend_pairs(query.to_params());
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn get_feedback(&self, id: u64) -> Result<FeedbackItem> {
        let id = id.to_string();
        let url = self.endpoint(&["feedback", &id]);
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn create_feedback(&self, record: &NewFeedback) -> Result<FeedbackItem> {
        let url = self.endpoint(&["feedback"]);
        self.send_json(self.request(Method::POST, url).json(record))
            .await
    }

    async fn patch_feedback(&self, id: u64, patch: &FeedbackPatch) -> Result<FeedbackItem> {
        let id = id.to_string();
        let url = self.endpoint(&["feedback", &id]);
        self.send_json(self.request(Method::PATCH, url).json(patch))
            .await
    }

    async fn list_comments(&self, id: u64) -> Result<Vec<Comment>> {
        let id = id.to_string();
        let url = self.endpoint(&["feedback", &id, "comments"]);
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn add_comment(&self, id: u64, comment: &NewComment) -> Result<Comment> {
        let id = id.to_string();
        let url = self.endpoint(&["feedback", &id, "comments"]);
        self.send_json(self.request(Method::POST, url).json(comment))
            .await
    }
}
