//! HTTP client for the catalog and AI retrieval service.
//!
//! Wraps `reqwest` with bearer authentication, a per-request
//! `X-Request-Id`, retry on transient failures, and typed response
//! deserialization. Requests that create something on the service are sent
//! once and never retried. Non-2xx responses surface as [`ClientError::Api`] with
//! the service's error message when it sends one.

use std::time::Duration;

use portfolio_core::{ActionError, ActionStatus, AppConfig, FeedbackItem, Product, ProductAction};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{ActionUpdate, AiAnswer, AiQuery, IngestionJob, JobStatus, NewProduct};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Client for the catalog service.
///
/// Use [`CatalogClient::new`] with an explicit base URL (tests point it at a
/// mock server) or [`CatalogClient::from_config`] to build one from
/// [`AppConfig`].
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CatalogClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute hierarchical URL.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("portfolio-cli/0.1")
            .build()?;

        // One trailing slash so joined endpoints extend the base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(format!(
                "'{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: token.map(str::to_owned),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Builds a client from the service settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConfigured`] when no base URL is set, or any
    /// error from [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let base_url = config
            .api_base_url
            .as_deref()
            .ok_or(ClientError::NotConfigured)?;
        Ok(Self::new(
            base_url,
            config.api_token.as_deref(),
            config.request_timeout_secs,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Overrides the retry policy. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// `GET /products`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not a product list.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.endpoint(&["products"])?;
        let products: Vec<Product> = self
            .execute("GET /products", || self.client.get(url.clone()))
            .await?;
        tracing::info!(count = products.len(), "fetched products");
        Ok(products)
    }

    /// `GET /feedback`.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn fetch_feedback(&self) -> Result<Vec<FeedbackItem>, ClientError> {
        let url = self.endpoint(&["feedback"])?;
        let items: Vec<FeedbackItem> = self
            .execute("GET /feedback", || self.client.get(url.clone()))
            .await?;
        tracing::info!(count = items.len(), "fetched feedback");
        Ok(items)
    }

    /// `GET /actions`, optionally limited to one product.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn fetch_actions(
        &self,
        product_id: Option<&str>,
    ) -> Result<Vec<ProductAction>, ClientError> {
        let mut url = self.endpoint(&["actions"])?;
        if let Some(id) = product_id {
            url.query_pairs_mut().append_pair("product_id", id);
        }
        let actions: Vec<ProductAction> = self
            .execute("GET /actions", || self.client.get(url.clone()))
            .await?;
        tracing::info!(count = actions.len(), product_id, "fetched actions");
        Ok(actions)
    }

    /// `POST /products`. Returns the product as stored by the service.
    ///
    /// Sent once: a timeout or 5xx may arrive after the product was stored.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ClientError> {
        let url = self.endpoint(&["products"])?;
        let created: Product = self
            .execute_once("POST /products", self.client.post(url).json(product))
            .await?;
        tracing::info!(product_id = %created.id, "created product");
        Ok(created)
    }

    /// `PATCH /actions/{id}`.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn update_action(
        &self,
        action_id: &str,
        update: &ActionUpdate,
    ) -> Result<ProductAction, ClientError> {
        let url = self.endpoint(&["actions", action_id])?;
        self.execute("PATCH /actions/{id}", || {
            self.client.patch(url.clone()).json(update)
        })
        .await
    }

    /// Moves `action` to `next` on the service. The transition is checked
    /// locally first, so a backwards move never reaches the network.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Action`] for a non-forward transition, or any
    /// error from [`CatalogClient::update_action`].
    pub async fn advance_action(
        &self,
        action: &ProductAction,
        next: ActionStatus,
    ) -> Result<ProductAction, ClientError> {
        if !action.status.can_advance_to(next) {
            return Err(ActionError::InvalidTransition {
                action_id: action.id.clone(),
                from: action.status,
                to: next,
            }
            .into());
        }
        let update = ActionUpdate {
            status: Some(next),
            description: None,
        };
        self.update_action(&action.id, &update).await
    }

    /// Saves a note on an action. Blank notes clear the stored note.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::update_action`].
    pub async fn save_action_note(
        &self,
        action_id: &str,
        note: &str,
    ) -> Result<ProductAction, ClientError> {
        let update = ActionUpdate {
            status: None,
            description: Some(note.trim().to_owned()),
        };
        self.update_action(action_id, &update).await
    }

    /// `POST /ai/query`.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn ask(&self, query: &AiQuery) -> Result<AiAnswer, ClientError> {
        let url = self.endpoint(&["ai", "query"])?;
        self.execute("POST /ai/query", || self.client.post(url.clone()).json(query))
            .await
    }

    /// `POST /documents` with the raw file bytes. Returns the ingestion job
    /// the service queued for the document. Sent once, like
    /// [`CatalogClient::create_product`].
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn upload_document(
        &self,
        filename: &str,
        product_id: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<IngestionJob, ClientError> {
        let mut url = self.endpoint(&["documents"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("filename", filename);
            if let Some(id) = product_id {
                pairs.append_pair("product_id", id);
            }
        }
        let size = bytes.len();
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        let job: IngestionJob = self.execute_once("POST /documents", request).await?;
        tracing::info!(job_id = %job.id, filename, size, "document queued for ingestion");
        Ok(job)
    }

    /// `GET /documents/jobs/{id}`.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn job_status(&self, job_id: &str) -> Result<IngestionJob, ClientError> {
        let url = self.endpoint(&["documents", "jobs", job_id])?;
        self.execute("GET /documents/jobs/{id}", || self.client.get(url.clone()))
            .await
    }

    /// Polls an ingestion job until it completes or fails, sleeping
    /// `poll_interval` between polls and giving up after `max_polls`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::IngestionFailed`] if the job reports `failed`.
    /// - [`ClientError::IngestionTimedOut`] if the job is still running after
    ///   `max_polls` polls.
    /// - Any error from [`CatalogClient::job_status`].
    pub async fn wait_for_ingestion(
        &self,
        job_id: &str,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Result<IngestionJob, ClientError> {
        for poll in 1..=max_polls {
            let job = self.job_status(job_id).await?;
            tracing::debug!(job_id, poll, status = %job.status, "polled ingestion job");
            match job.status {
                JobStatus::Completed => return Ok(job),
                JobStatus::Failed => {
                    return Err(ClientError::IngestionFailed {
                        job_id: job_id.to_owned(),
                        reason: job.error.unwrap_or_else(|| "no reason given".to_owned()),
                    })
                }
                JobStatus::Queued | JobStatus::Processing | JobStatus::Unknown => {}
            }
            if poll < max_polls {
                tokio::time::sleep(poll_interval).await;
            }
        }
        Err(ClientError::IngestionTimedOut {
            job_id: job_id.to_owned(),
            polls: max_polls,
        })
    }

    /// Base URL extended with percent-encoded path `segments`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request produced by `build` with retry, then parses a 2xx
    /// body as JSON. `build` runs once per attempt.
    async fn execute<T, B>(&self, context: &str, build: B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Fn() -> RequestBuilder,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || {
            let request = self.authorize(build());
            async move { Self::send_json(request, context).await }
        })
        .await
    }

    /// Sends `request` a single time, for calls that are not safe to repeat.
    async fn execute_once<T: DeserializeOwned>(
        &self,
        context: &str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        Self::send_json(self.authorize(request), context).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Pulls a human message out of an error body: a JSON `detail`, `message`
/// or `error` string, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(serde_json::Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_owned()
            } else {
                trimmed.to_owned()
            }
        })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
