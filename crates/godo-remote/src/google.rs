//! Google Tasks v1 REST client.

use std::time::Duration;

use async_trait::async_trait;
use godo_config::GoogleConfig;
use godo_core::Task;
use serde::de::DeserializeOwned;

use crate::TaskRemote;
use crate::error::RemoteError;
use crate::http::check_response;
use crate::oauth::TokenSource;
use crate::wire::{Page, WireTask, WireTaskList};

/// Largest page the API serves.
const PAGE_SIZE: u32 = 100;

pub struct GoogleTasksClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenSource,
}

impl GoogleTasksClient {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &GoogleConfig, tokens: TokenSource) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("godo/0.1")
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .expect("reqwest client should build"),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Client using the token persisted at `config.token_path`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotAuthenticated` if no usable token is stored.
    pub fn from_config(config: &GoogleConfig) -> Result<Self, RemoteError> {
        Ok(Self::new(config, TokenSource::from_config(config)?))
    }

    fn lists_url(&self) -> String {
        format!("{}/users/@me/lists?maxResults={PAGE_SIZE}", self.base_url)
    }

    fn tasks_url(&self, list_id: &str) -> String {
        format!(
            "{}/lists/{}/tasks?maxResults={PAGE_SIZE}&showCompleted=true&showHidden=true",
            self.base_url,
            urlencoding::encode(list_id)
        )
    }

    fn task_url(&self, list_id: &str, task_id: &str) -> String {
        format!(
            "{}/lists/{}/tasks/{}",
            self.base_url,
            urlencoding::encode(list_id),
            urlencoding::encode(task_id)
        )
    }

    /// Follow `nextPageToken` until the collection is exhausted.
    async fn get_all<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, RemoteError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page_url = match &page_token {
                Some(token) => format!("{url}&pageToken={}", urlencoding::encode(token)),
                None => url.to_string(),
            };
            let auth = self.tokens.authorization().await?;
            let resp = self
                .http
                .get(&page_url)
                .header(reqwest::header::AUTHORIZATION, auth)
                .send()
                .await?;
            let page: Page<T> = check_response(resp).await?.json().await?;
            items.extend(page.items);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(next) => page_token = Some(next),
                None => return Ok(items),
            }
        }
    }
}

#[async_trait]
impl TaskRemote for GoogleTasksClient {
    async fn list_lists(&self) -> Result<Vec<Task>, RemoteError> {
        let lists: Vec<WireTaskList> = self.get_all(&self.lists_url()).await?;
        tracing::debug!(count = lists.len(), "fetched task lists");
        Ok(lists.into_iter().map(WireTaskList::into_container).collect())
    }

    async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, RemoteError> {
        let tasks: Vec<WireTask> = self.get_all(&self.tasks_url(list_id)).await?;
        tracing::debug!(list_id, count = tasks.len(), "fetched tasks");
        Ok(tasks
            .into_iter()
            .filter(|task| !task.deleted)
            .map(WireTask::into_task)
            .collect())
    }

    async fn create_task(&self, list_id: &str, task: &Task) -> Result<Task, RemoteError> {
        let collection = format!("{}/lists/{}/tasks", self.base_url, urlencoding::encode(list_id));
        let url = if task.parent.is_empty() {
            collection
        } else {
            format!("{collection}?parent={}", urlencoding::encode(&task.parent))
        };
        let auth = self.tokens.authorization().await?;
        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&WireTask::from_task(task))
            .send()
            .await?;
        let created: WireTask = check_response(resp).await?.json().await?;
        tracing::debug!(list_id, id = %created.id, "created task");
        Ok(created.into_task())
    }

    async fn update_task(&self, list_id: &str, task: &Task) -> Result<Task, RemoteError> {
        let auth = self.tokens.authorization().await?;
        let resp = self
            .http
            .put(self.task_url(list_id, &task.id))
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&WireTask::from_task(task))
            .send()
            .await?;
        let updated: WireTask = check_response(resp).await?.json().await?;
        tracing::debug!(list_id, id = %updated.id, "updated task");
        Ok(updated.into_task())
    }

    async fn delete_task(&self, list_id: &str, id: &str) -> Result<(), RemoteError> {
        let auth = self.tokens.authorization().await?;
        let resp = self
            .http
            .delete(self.task_url(list_id, id))
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;
        check_response(resp).await?;
        tracing::debug!(list_id, id, "deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::OAuthClient;
    use godo_store::{OAuthToken, TokenStore};

    fn client(base: &str) -> (GoogleTasksClient, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = GoogleConfig {
            api_base_url: base.into(),
            ..GoogleConfig::default()
        };
        let token = OAuthToken {
            access_token: "a".into(),
            token_type: "Bearer".into(),
            refresh_token: None,
            expiry: None,
        };
        let tokens = TokenSource::new(
            OAuthClient::new(&config),
            TokenStore::new(dir.path().join("token.json")),
            token,
        );
        (GoogleTasksClient::new(&config, tokens), dir)
    }

    #[test]
    fn urls_are_built_from_base() {
        let (client, _dir) = client("https://tasks.example.test/tasks/v1/");
        assert_eq!(
            client.lists_url(),
            "https://tasks.example.test/tasks/v1/users/@me/lists?maxResults=100"
        );
        assert_eq!(
            client.tasks_url("L 1"),
            "https://tasks.example.test/tasks/v1/lists/L%201/tasks?maxResults=100&showCompleted=true&showHidden=true"
        );
        assert_eq!(
            client.task_url("L1", "a/b"),
            "https://tasks.example.test/tasks/v1/lists/L1/tasks/a%2Fb"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // Port 9 (discard) on localhost is closed in test environments.
        let (client, _dir) = client("http://127.0.0.1:9/tasks/v1");
        let err = client.list_lists().await.unwrap_err();
        assert!(err.is_unavailable(), "got {err:?}");
    }
}
