//! HTTP client wrapper - executes API calls against the configured base address

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{Account, AccountForm, AccountId, LogEntry, Settings, Status};
use crate::network::api::WarmupApi;

/// reqwest-backed [`WarmupApi`]
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        ApiClient {
            client: create_client(),
            base: config.api_base.clone(),
        }
    }

    /// Join path segments onto the base address, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{}: cannot have paths", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "Sending request");

        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn get_json<T: DeserializeOwned + Default>(&self, segments: &[&str]) -> Result<T> {
        let resp = self.execute::<()>(Method::GET, segments, None).await?;
        let bytes = resp.bytes().await?;
        decode_or_default(&bytes)
    }

    /// Requests whose response body is not needed
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<()> {
        self.execute(method, segments, body).await.map(|_| ())
    }
}

/// Decode a JSON body, treating an empty body or `null` as `T::default()`
pub(crate) fn decode_or_default<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice::<Option<T>>(bytes)?.unwrap_or_default())
}

#[async_trait]
impl WarmupApi for ApiClient {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get_json(&["accounts"]).await
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        self.get_json(&["logs"]).await
    }

    async fn status(&self) -> Result<Status> {
        self.get_json(&["status"]).await
    }

    async fn create_account(&self, form: &AccountForm) -> Result<()> {
        self.send(Method::POST, &["accounts"], Some(form)).await
    }

    async fn delete_account(&self, id: &AccountId) -> Result<()> {
        self.send::<()>(Method::DELETE, &["accounts", id.as_str()], None).await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<()> {
        self.send(Method::POST, &["settings"], Some(settings)).await
    }

    async fn start_warmup(&self) -> Result<()> {
        self.send::<()>(Method::POST, &["warmup", "start"], None).await
    }

    async fn stop_warmup(&self) -> Result<()> {
        self.send::<()>(Method::POST, &["warmup", "stop"], None).await
    }

    async fn clear_logs(&self) -> Result<()> {
        self.send::<()>(Method::POST, &["logs", "clear"], None).await
    }

    async fn delete_logs(&self) -> Result<()> {
        self.send::<()>(Method::DELETE, &["logs"], None).await
    }
}

/// Create an HTTP client with default configuration.
///
/// No timeout is set; a hung request is bounded by the next poll racing it.
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("warmup-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
