//! HTTP client for the open-data catalog search endpoint

use reqwest::Client as HttpClient;
use tracing::{debug, info};

use super::errors::CatalogError;
use super::types::SearchResponse;
use crate::config::Config;

/// Thin wrapper over `reqwest` bound to one dataset. The browser keeps a
/// single instance for the whole session.
pub struct CatalogClient {
    http: HttpClient,
    api_url: String,
    dataset: String,
    rows_per_page: usize,
}

impl CatalogClient {
    /// Build the client from configuration. Failure here is a fatal
    /// configuration error, not a fetch failure.
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http = HttpClient::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            dataset: config.dataset.clone(),
            rows_per_page: config.rows_per_page,
        })
    }

    /// Fetch one page of records starting at `start`. `query` is free text;
    /// blank queries are not sent at all.
    pub async fn fetch_page(
        &self,
        query: &str,
        start: usize,
    ) -> Result<SearchResponse, CatalogError> {
        let params = page_params(&self.dataset, self.rows_per_page, start, query);

        debug!("GET {} with {:?}", self.api_url, params);

        let response = self
            .http
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let page: SearchResponse = serde_json::from_str(&body)?;

        info!(
            "Fetched {} record(s) at offset {} ({} total hits)",
            page.records.len(),
            start,
            page.nhits
        );

        Ok(page)
    }
}

/// Build the query-parameter list for one page request. The free-text `q`
/// parameter is included only when the trimmed query is non-empty.
pub fn page_params(
    dataset: &str,
    rows: usize,
    start: usize,
    query: &str,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("dataset", dataset.to_string()),
        ("rows", rows.to_string()),
        ("start", start.to_string()),
    ];

    let trimmed = query.trim();
    if !trimmed.is_empty() {
        params.push(("q", trimmed.to_string()));
    }

    params
}
