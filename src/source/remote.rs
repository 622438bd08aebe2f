//! Client for the remote catalog listing API.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::MonsterSource;
use crate::config::RemoteConfig;
use crate::constants::{SELECT_ALL_PATH, SELECT_BY_ID_PATH};
use crate::domain::{ListParams, MonsterFullListResponse, MonsterFullResponse};
use crate::error::{CatalogError, Result};
use crate::metrics::SourceMetrics;

pub struct RemoteSource {
    client: Client,
    base_url: String,
    fetch_page_size: usize,
    owned: HashSet<u64>,
}

impl RemoteSource {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_page_size: config.fetch_page_size.max(1),
            owned: config.owned_ids.iter().copied().collect(),
        })
    }

    pub fn with_owned_ids(mut self, owned: impl IntoIterator<Item = u64>) -> Self {
        self.owned = owned.into_iter().collect();
        self
    }

    /// `GET /monster/select/all` with the given query parameters.
    pub async fn list(&self, params: &ListParams) -> Result<MonsterFullListResponse> {
        let url = format!("{}{}", self.base_url, SELECT_ALL_PATH);
        debug!(url = %url, ?params, "Requesting monster listing");
        let response = self.client.get(&url).query(params).send().await?;
        read_json(response).await
    }

    /// `GET /monster/select/{id}`; a 404 answer is `Ok(None)`.
    pub async fn get(&self, id: u64, include_images: bool) -> Result<Option<MonsterFullResponse>> {
        let url = format!("{}{}/{}", self.base_url, SELECT_BY_ID_PATH, id);
        let response = self
            .client
            .get(&url)
            .query(&[("includeImages", include_images)])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    async fn fetch_all(&self) -> Result<Vec<MonsterFullResponse>> {
        let size = i64::try_from(self.fetch_page_size).unwrap_or(i64::MAX);
        let mut documents = Vec::new();
        let mut page = 0;
        loop {
            let mut params = ListParams::page(page, size);
            params.include_images = Some(false);
            let listing = self.list(&params).await?;
            let received = listing.items.len();
            documents.extend(listing.items);
            debug!(page, received, total = listing.total, "Fetched listing page");

            if received == 0 || documents.len() >= listing.total {
                break;
            }
            page += 1;
        }
        Ok(documents)
    }
}

/// Decodes a success body, or turns a failure into [`CatalogError::Api`].
///
/// The error message is taken from a JSON `message` field when the server
/// sends one, otherwise it is `Request failed: {status}`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    let payload = if is_json {
        response.json::<serde_json::Value>().await.ok()
    } else {
        None
    };
    let message = payload
        .as_ref()
        .and_then(|p| p.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed: {}", status.as_u16()));

    Err(CatalogError::Api {
        status: status.as_u16(),
        message,
        payload,
    })
}

#[async_trait]
impl MonsterSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn documents(&self) -> Result<Vec<MonsterFullResponse>> {
        let started = Instant::now();
        match self.fetch_all().await {
            Ok(documents) => {
                SourceMetrics::record_fetch_success(started.elapsed().as_secs_f64(), documents.len());
                info!(
                    base_url = %self.base_url,
                    monsters = documents.len(),
                    "Fetched remote catalog"
                );
                Ok(documents)
            }
            Err(e) => {
                SourceMetrics::record_fetch_error();
                warn!(base_url = %self.base_url, error = %e, "Remote catalog fetch failed");
                Err(e)
            }
        }
    }

    async fn owned_ids(&self) -> Result<HashSet<u64>> {
        Ok(self.owned.clone())
    }

    async fn detail(&self, id: u64) -> Result<Option<MonsterFullResponse>> {
        self.get(id, true).await
    }
}
