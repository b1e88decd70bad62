//! Page sources: the Airtable REST API and a directory of JSON fixtures.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::Table;
use super::records::RecordPage;
use crate::config::{AirtableConfig, TableIds};
use crate::errors::{AppError, AppResult};

/// One page of raw records per call; `offset` is the cursor returned by the
/// previous page.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_page(&self, table: Table, offset: Option<&str>) -> AppResult<RecordPage>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

pub struct AirtableSource {
    client: reqwest::Client,
    api_url: Url,
    base_id: String,
    token: String,
    tables: TableIds,
    page_size: u32,
    retry: RetryPolicy,
}

impl AirtableSource {
    pub fn new(cfg: &AirtableConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: Url::parse(&cfg.api_url)?,
            base_id: cfg.base_id.clone(),
            token: cfg.token.clone(),
            tables: cfg.tables.clone(),
            page_size: cfg.page_size,
            retry: RetryPolicy {
                max_attempts: cfg.max_retries,
                delay: Duration::from_secs(cfg.retry_delay_secs),
            },
        })
    }

    /// `{api_url}/{base}/{table}?pageSize=N[&offset=…]`
    pub fn page_url(&self, table: Table, offset: Option<&str>) -> AppResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("invalid api_url '{}'", self.api_url)))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(table.id(&self.tables));

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }

        Ok(url)
    }

    async fn send_with_retry(&self, table: Table, url: Url) -> AppResult<RecordPage> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = self
                .client
                .get(url.clone())
                .bearer_auth(&self.token)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json::<RecordPage>().await?);
                    }
                    if is_retryable(status) && attempt < attempts {
                        warn!(
                            %table, attempt, attempts, status = status.as_u16(),
                            "airtable request failed, retrying in {:?}", self.retry.delay
                        );
                        tokio::time::sleep(self.retry.delay).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::Airtable {
                        table: table.name().to_string(),
                        status: status.as_u16(),
                        message: body.chars().take(200).collect(),
                    });
                }
                Err(err) => {
                    if attempt < attempts {
                        warn!(
                            %table, attempt, attempts, error = %err,
                            "airtable transport error, retrying in {:?}", self.retry.delay
                        );
                        tokio::time::sleep(self.retry.delay).await;
                        continue;
                    }
                    return Err(AppError::Http(err));
                }
            }
        }
    }
}

#[async_trait]
impl RecordSource for AirtableSource {
    async fn fetch_page(&self, table: Table, offset: Option<&str>) -> AppResult<RecordPage> {
        let url = self.page_url(table, offset)?;
        debug!(%table, %url, "fetching page");
        self.send_with_retry(table, url).await
    }

    fn describe(&self) -> String {
        format!("airtable base {}", self.base_id)
    }
}

/// Reads `{dir}/{table}.json`. The file holds either a single page object
/// or an array of page objects; in the latter case the cursor is the index
/// of the next page.
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn read_pages(&self, table: Table) -> AppResult<Vec<RecordPage>> {
        let path = self.dir.join(format!("{}.json", table.name()));
        if !path.exists() {
            debug!(%table, path = %path.display(), "fixture missing, returning no records");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let pages = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };
        Ok(pages)
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    async fn fetch_page(&self, table: Table, offset: Option<&str>) -> AppResult<RecordPage> {
        let pages = self.read_pages(table)?;
        let index = match offset {
            Some(o) => o
                .parse::<usize>()
                .map_err(|_| AppError::Other(format!("invalid fixture offset '{o}'")))?,
            None => 0,
        };

        let Some(page) = pages.get(index) else {
            return Ok(RecordPage::default());
        };

        let next = index + 1;
        Ok(RecordPage {
            records: page.records.clone(),
            offset: (next < pages.len()).then(|| next.to_string()),
        })
    }

    fn describe(&self) -> String {
        format!("fixtures in {}", self.dir.display())
    }
}
