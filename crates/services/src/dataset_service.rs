use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use quiz_core::DatasetFilter;
use quiz_core::dataset::records;
use quiz_core::model::Roster;

use crate::error::{DatasetError, FetchError};

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/SchaleDB/SchaleDB/main/data/en/students.json";
pub const DEFAULT_PORTRAIT_BASE_URL: &str = "https://schaledb.com/images/student/collection/";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Where the student dataset and portraits come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    pub dataset_url: Url,
    pub portrait_base: Url,
    pub timeout: Duration,
}

impl DatasetConfig {
    /// Read `QUIZ_DATASET_URL`, `QUIZ_PORTRAIT_BASE_URL` and
    /// `QUIZ_FETCH_TIMEOUT_SECS`, falling back to defaults for anything unset
    /// or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let dataset_url = env::var("QUIZ_DATASET_URL")
            .ok()
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .unwrap_or(defaults.dataset_url);
        let portrait_base = env::var("QUIZ_PORTRAIT_BASE_URL")
            .ok()
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .unwrap_or(defaults.portrait_base);
        let timeout = env::var("QUIZ_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.timeout, Duration::from_secs);

        Self {
            dataset_url,
            portrait_base,
            timeout,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dataset_url: Url::parse(DEFAULT_DATASET_URL).expect("default dataset url is valid"),
            portrait_base: Url::parse(DEFAULT_PORTRAIT_BASE_URL)
                .expect("default portrait url is valid"),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

//
// ─── ROSTER SOURCE ─────────────────────────────────────────────────────────────
//

/// Supplies the roster a quiz draws from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Return the roster, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the roster cannot be produced.
    async fn roster(&self) -> Result<Arc<Roster>, DatasetError>;
}

/// A roster fixed at construction, for tests and offline play.
#[derive(Clone, Debug)]
pub struct StaticRoster {
    roster: Arc<Roster>,
}

impl StaticRoster {
    #[must_use]
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: Arc::new(roster),
        }
    }
}

#[async_trait]
impl RosterSource for StaticRoster {
    async fn roster(&self) -> Result<Arc<Roster>, DatasetError> {
        Ok(Arc::clone(&self.roster))
    }
}

//
// ─── HTTP DATASET ──────────────────────────────────────────────────────────────
//

/// Fetches the student dataset over HTTP and caches the filtered roster.
pub struct DatasetService {
    client: Client,
    config: DatasetConfig,
    cached: Mutex<Option<Arc<Roster>>>,
}

impl DatasetService {
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(config: DatasetConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    /// Use a preconfigured client; `config.timeout` is not applied to it.
    #[must_use]
    pub fn with_client(config: DatasetConfig, client: Client) -> Self {
        Self {
            client,
            config,
            cached: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Fetch a fresh roster and replace the cached one.
    ///
    /// The previous roster stays cached if the fetch fails.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Unavailable` for network or HTTP failures and
    /// `DatasetError::Roster` when nothing survives normalization.
    pub async fn refresh(&self) -> Result<Arc<Roster>, DatasetError> {
        let mut cached = self.cached.lock().await;
        let roster = Arc::new(self.fetch_roster().await?);
        *cached = Some(Arc::clone(&roster));
        Ok(roster)
    }

    /// Fetch and normalize without touching the cache.
    ///
    /// # Errors
    ///
    /// See [`DatasetService::refresh`].
    pub async fn fetch_roster(&self) -> Result<Roster, DatasetError> {
        let document = self.fetch_document().await.inspect_err(|err| {
            tracing::warn!(url = %self.config.dataset_url, error = %err, "dataset fetch failed");
        })?;
        roster_from_document(&document)
    }

    async fn fetch_document(&self) -> Result<Value, FetchError> {
        tracing::debug!(url = %self.config.dataset_url, "fetching dataset");
        let response = self
            .client
            .get(self.config.dataset_url.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl RosterSource for DatasetService {
    async fn roster(&self) -> Result<Arc<Roster>, DatasetError> {
        let mut cached = self.cached.lock().await;
        if let Some(roster) = cached.as_ref() {
            return Ok(Arc::clone(roster));
        }
        let roster = Arc::new(self.fetch_roster().await?);
        *cached = Some(Arc::clone(&roster));
        Ok(roster)
    }
}

/// Filter a fetched dataset document into a roster.
///
/// # Errors
///
/// Returns `FetchError::UnexpectedShape` (as `DatasetError::Unavailable`) if the
/// document holds no records, or `DatasetError::Roster` if none are valid.
pub fn roster_from_document(document: &Value) -> Result<Roster, DatasetError> {
    let items = records(document).ok_or(FetchError::UnexpectedShape)?;
    Ok(DatasetFilter::filter(items)?)
}
