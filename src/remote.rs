//! Read-only remote task source.
//!
//! The remote list is a single JSON page:
//! `{ "todos": [{ "id", "todo", "description"?, "completed", "userId" }], "total", "skip", "limit" }`.

use crate::types::TaskRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default list endpoint.
pub const DEFAULT_REMOTE_URL: &str = "https://dummyjson.com/todos";

/// Why a remote fetch produced no task list.
#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("remote returned HTTP {0}")]
    Status(u16),

    #[error("could not decode task list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("remote returned no tasks")]
    EmptyPayload,

    #[error("remote task source is disabled")]
    Disabled,
}

/// One task as the remote serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTodo {
    pub id: i64,
    #[serde(alias = "title")]
    pub todo: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    #[serde(rename = "userId", alias = "ownerId")]
    pub user_id: i64,
}

impl RemoteTodo {
    /// Adopt the remote record as-is, stamping it with the import time.
    pub fn into_record(self, created_at: i64) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.todo,
            description: self.description,
            completed: self.completed,
            owner_id: self.user_id,
            created_at,
        }
    }
}

/// A page of remote tasks with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<RemoteTodo>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Source of the initial task list. Either the full list comes back or the call fails.
#[async_trait]
pub trait RemoteTaskSource: Send + Sync {
    async fn fetch(&self) -> Result<TodoPage, RemoteFetchError>;
}

#[async_trait]
impl<T: RemoteTaskSource + ?Sized> RemoteTaskSource for Arc<T> {
    async fn fetch(&self) -> Result<TodoPage, RemoteFetchError> {
        (**self).fetch().await
    }
}

#[async_trait]
impl<T: RemoteTaskSource + ?Sized> RemoteTaskSource for Box<T> {
    async fn fetch(&self) -> Result<TodoPage, RemoteFetchError> {
        (**self).fetch().await
    }
}

/// Fetches the task list with a single HTTP GET.
pub struct HttpTaskSource {
    url: String,
    client: reqwest::Client,
}

impl HttpTaskSource {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RemoteFetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            url: url.into(),
            client: builder.build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteTaskSource for HttpTaskSource {
    async fn fetch(&self) -> Result<TodoPage, RemoteFetchError> {
        debug!(url = %self.url, "Fetching remote tasks");
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let page = decode_page(&body)?;
        info!(count = page.todos.len(), total = page.total, "Fetched remote tasks");
        Ok(page)
    }
}

/// Decode a response body. An empty body or an empty `todos` list is an `EmptyPayload`.
pub fn decode_page(body: &[u8]) -> Result<TodoPage, RemoteFetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RemoteFetchError::EmptyPayload);
    }
    let page: TodoPage = serde_json::from_slice(body)?;
    if page.todos.is_empty() {
        return Err(RemoteFetchError::EmptyPayload);
    }
    Ok(page)
}

/// Stand-in used when the remote is turned off in config.
pub struct DisabledSource;

#[async_trait]
impl RemoteTaskSource for DisabledSource {
    async fn fetch(&self) -> Result<TodoPage, RemoteFetchError> {
        Err(RemoteFetchError::Disabled)
    }
}
