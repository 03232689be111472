//! HTTP client for a running tgcast server.

use anyhow::{Context, bail};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use cast_core::input::NewTask;
use cast_core::responses::{Stats, TaskView};
use cast_server::error::ErrorBody;
use cast_server::routes::tasks::{Ack, TaskList};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tgcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub async fn list_tasks(&self) -> anyhow::Result<Vec<TaskView>> {
        let list: TaskList = self.call(Method::GET, "/api/tasks", None::<&()>).await?;
        Ok(list.tasks)
    }

    pub async fn get_task(&self, id: &str) -> anyhow::Result<TaskView> {
        self.call(Method::GET, &format!("/api/tasks/{id}"), None::<&()>)
            .await
    }

    pub async fn create_task(&self, request: &NewTask) -> anyhow::Result<Ack> {
        self.call(Method::POST, "/api/tasks", Some(request)).await
    }

    pub async fn start_task(&self, id: &str) -> anyhow::Result<Ack> {
        self.call(Method::POST, &format!("/api/tasks/{id}/start"), None::<&()>)
            .await
    }

    pub async fn stop_task(&self, id: &str) -> anyhow::Result<Ack> {
        self.call(Method::POST, &format!("/api/tasks/{id}/stop"), None::<&()>)
            .await
    }

    pub async fn delete_task(&self, id: &str) -> anyhow::Result<Ack> {
        self.call(Method::DELETE, &format!("/api/tasks/{id}"), None::<&()>)
            .await
    }

    pub async fn stats(&self) -> anyhow::Result<Stats> {
        self.call(Method::GET, "/api/stats", None::<&()>).await
    }

    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> anyhow::Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %url, "calling tgcast server");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("cannot reach tgcast server at {}", self.base_url))?;

        let status = response.status();
        let bytes = response.bytes().await.context("failed to read response")?;
        if !status.is_success() {
            bail!("{}", describe_failure(status, &bytes));
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("unexpected response from {url}"))
    }
}

/// Error text for a non-2xx answer, preferring the server's own message.
fn describe_failure(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error) => format!("{} ({status})", error.error),
        Err(_) => format!("server answered {status}"),
    }
}
