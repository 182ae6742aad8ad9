//! Release polling and the "new version" notice.
//!
//! The checker records when it last looked and what it found in the `Local`
//! store scope, so a notice can be shown between checks without touching the
//! network.

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use serde_json::json;

use crate::config::UpdateSettings;
use crate::error::UpdateError;
use crate::store::{KeyValueStore, StorageScope};

/// Unix seconds of the last completed check.
pub const LAST_UPDATE_CHECK_KEY: &str = "lastUpdateCheck";
/// Tag of the newest release seen.
pub const LATEST_VERSION_KEY: &str = "latestVersion";
/// Page of the newest release seen.
pub const LATEST_RELEASE_URL_KEY: &str = "latestReleaseUrl";

const UPDATE_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// `major.minor.patch` with an optional pre-release tag.
///
/// The pre-release tag is kept for display only; ordering and equality look
/// at the numeric triple.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl Version {
    /// Parse `v1.2.3`, `1.2`, `1.2.3-beta.1` and similar.
    pub fn parse(raw: &str) -> Result<Self, UpdateError> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let (numbers, pre) = match body.split_once('-') {
            Some((numbers, pre)) => (numbers, Some(pre.to_string())),
            None => (body, None),
        };

        let mut parts = numbers.split('.');
        let mut next = |required: bool| -> Result<u64, UpdateError> {
            match parts.next() {
                Some(part) => part
                    .parse::<u64>()
                    .map_err(|_| UpdateError::Version(raw.to_string())),
                None if required => Err(UpdateError::Version(raw.to_string())),
                None => Ok(0),
            }
        };
        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(UpdateError::Version(raw.to_string()));
        }

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Version of this build.
    pub fn current() -> Result<Self, UpdateError> {
        Self::parse(crate::build_info::VERSION)
    }

    fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// True when no check has happened yet or `interval` has elapsed since it did.
///
/// A `last_check` in the future (clock moved back) counts as due.
pub fn should_check(now: u64, last_check: Option<u64>, interval: Duration) -> bool {
    match last_check {
        None => true,
        Some(last) if last > now => true,
        Some(last) => now - last >= interval.as_secs(),
    }
}

pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|delta| delta.as_secs())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// A newer release is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    pub current: Version,
    pub latest: Version,
    pub url: String,
}

impl UpdateNotice {
    /// Text for the toolbar badge.
    pub fn badge_text(&self) -> &'static str {
        "NEW"
    }

    pub fn banner(&self) -> String {
        if self.url.is_empty() {
            format!("tintcast {} is available (you have {})", self.latest, self.current)
        } else {
            format!(
                "tintcast {} is available (you have {}): {}",
                self.latest, self.current, self.url
            )
        }
    }
}

/// Release payload from the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: String,
}

/// Notice for `release` if it is newer than `current`.
pub fn evaluate(current: &Version, release: &Release) -> Result<Option<UpdateNotice>, UpdateError> {
    let latest = Version::parse(&release.tag_name)?;
    if latest > *current {
        Ok(Some(UpdateNotice {
            current: current.clone(),
            latest,
            url: release.html_url.clone(),
        }))
    } else {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// Polls the release endpoint and caches the result in the local scope.
pub struct UpdateChecker {
    endpoint: String,
    interval: Duration,
    store: Arc<dyn KeyValueStore>,
}

impl UpdateChecker {
    pub fn new(settings: &UpdateSettings, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            interval: Duration::from_secs(settings.interval_hours.max(1) * 3600),
            store,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch the latest release now, ignoring the interval.
    pub async fn check(&self, current: &Version) -> Result<Option<UpdateNotice>, UpdateError> {
        self.check_at(current, unix_now_secs()).await
    }

    /// Check only if the interval elapsed; otherwise answer from the cache.
    pub async fn poll(
        &self,
        current: &Version,
        now: u64,
    ) -> Result<Option<UpdateNotice>, UpdateError> {
        let last = self
            .store
            .get(StorageScope::Local, LAST_UPDATE_CHECK_KEY)
            .await?
            .and_then(|value| value.as_u64());
        if should_check(now, last, self.interval) {
            return self.check_at(current, now).await;
        }
        tracing::debug!(?last, now, "update check not due; using cached release");
        self.cached_notice(current).await
    }

    /// Notice built from the last recorded release, without network access.
    pub async fn cached_notice(
        &self,
        current: &Version,
    ) -> Result<Option<UpdateNotice>, UpdateError> {
        let Some(tag) = self
            .store
            .get(StorageScope::Local, LATEST_VERSION_KEY)
            .await?
            .and_then(|value| value.as_str().map(str::to_string))
        else {
            return Ok(None);
        };
        let url = self
            .store
            .get(StorageScope::Local, LATEST_RELEASE_URL_KEY)
            .await?
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        evaluate(
            current,
            &Release {
                tag_name: tag,
                html_url: url,
            },
        )
    }

    async fn check_at(
        &self,
        current: &Version,
        now: u64,
    ) -> Result<Option<UpdateNotice>, UpdateError> {
        let release = self.fetch_latest().await?;
        let notice = evaluate(current, &release)?;
        self.record(&release, now).await?;
        match &notice {
            Some(notice) => tracing::info!(latest = %notice.latest, "newer release available"),
            None => tracing::debug!(tag = %release.tag_name, "already up to date"),
        }
        Ok(notice)
    }

    async fn fetch_latest(&self) -> Result<Release, UpdateError> {
        let response = shared_update_http_client()
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(UpdateError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn record(&self, release: &Release, now: u64) -> Result<(), UpdateError> {
        self.store
            .set(StorageScope::Local, LAST_UPDATE_CHECK_KEY, json!(now))
            .await?;
        self.store
            .set(
                StorageScope::Local,
                LATEST_VERSION_KEY,
                json!(release.tag_name),
            )
            .await?;
        self.store
            .set(
                StorageScope::Local,
                LATEST_RELEASE_URL_KEY,
                json!(release.html_url),
            )
            .await?;
        Ok(())
    }
}

fn shared_update_http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(UPDATE_HTTP_TIMEOUT)
            .user_agent(concat!("tintcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}
