//! Redmine tracker implementation
//!
//! Talks to a Redmine-style REST API: `GET /issues/{id}.json`,
//! `PUT /issues/{id}.json`, and the catalog listing endpoints.

use crate::error::{Error, Result};
use crate::tracker::{CatalogEntry, TrackerService};
use crate::types::{TrackerIssue, TrackerPatch};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Custom field carrying the named release on backport issues.
const RELEASE_FIELD: &str = "Release";

// Wire types for Redmine JSON payloads

#[derive(Deserialize)]
struct IssueEnvelope {
    issue: WireIssue,
}

#[derive(Deserialize)]
struct WireIssue {
    id: u64,
    subject: String,
    #[serde(default)]
    description: Option<String>,
    status: CatalogEntry,
    tracker: CatalogEntry,
    #[serde(default)]
    fixed_version: Option<CatalogEntry>,
    #[serde(default)]
    custom_fields: Vec<WireCustomField>,
}

#[derive(Deserialize)]
struct WireCustomField {
    name: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct StatusList {
    issue_statuses: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct TrackerTypeList {
    trackers: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct VersionList {
    versions: Vec<CatalogEntry>,
}

impl From<WireIssue> for TrackerIssue {
    fn from(w: WireIssue) -> Self {
        let release_field = w
            .custom_fields
            .iter()
            .find(|f| f.name == RELEASE_FIELD)
            .and_then(|f| f.value.as_ref())
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        Self {
            id: w.id,
            subject: w.subject,
            status: w.status.name,
            tracker_type: w.tracker.name,
            release_field,
            target_version: w.fixed_version.map(|v| v.name),
            description: w.description.unwrap_or_default(),
        }
    }
}

/// Redmine service using reqwest
pub struct RedmineTracker {
    http: Client,
    base_url: Url,
    host: String,
    api_key: String,
    project: String,
}

impl RedmineTracker {
    /// Create a new tracker client.
    ///
    /// `base_url` is the tracker root (e.g. `https://tracker.ceph.com`);
    /// `project` is the project whose version catalog is consulted.
    pub fn new(base_url: &str, project: String, api_key: String) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid tracker URL {base_url}: {e}")))?;
        // Endpoints join relative to the base, so a tracker rooted at a
        // subpath keeps its prefix. Joining needs the trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let host = base_url
            .host_str()
            .ok_or_else(|| Error::Config(format!("tracker URL {base_url} has no host")))?
            .to_string();
        let http = Client::builder()
            .user_agent("backport-resolve")
            .build()
            .map_err(|e| Error::Tracker(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            host,
            api_key,
            project,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Tracker(format!("bad endpoint {path}: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url.clone())
            .header("X-Redmine-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Tracker(format!("GET {path} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::Tracker(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| Error::Tracker(format!("GET {path}: malformed response: {e}")))
    }
}

#[async_trait]
impl TrackerService for RedmineTracker {
    async fn fetch_issue(&self, id: u64) -> Result<TrackerIssue> {
        debug!(id, "fetching tracker issue");
        let envelope: IssueEnvelope = self.get_json(&format!("issues/{id}.json")).await?;
        let issue = TrackerIssue::from(envelope.issue);
        debug!(id, status = %issue.status, tracker = %issue.tracker_type, "fetched tracker issue");
        Ok(issue)
    }

    async fn update_issue(&self, patch: &TrackerPatch) -> Result<()> {
        let id = patch.issue_id;
        debug!(
            id,
            status_id = ?patch.status_id,
            fixed_version_id = ?patch.fixed_version_id,
            "updating tracker issue"
        );
        let path = format!("issues/{id}.json");
        let url = self.endpoint(&path)?;
        let response = self
            .http
            .put(url)
            .header("X-Redmine-API-Key", &self.api_key)
            .json(&serde_json::json!({ "issue": patch }))
            .send()
            .await
            .map_err(|e| Error::Tracker(format!("PUT {path} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::Tracker(format!(
                "PUT {path} returned {}",
                response.status()
            )));
        }
        debug!(id, "updated tracker issue");
        Ok(())
    }

    async fn list_statuses(&self) -> Result<Vec<CatalogEntry>> {
        let list: StatusList = self.get_json("issue_statuses.json").await?;
        Ok(list.issue_statuses)
    }

    async fn list_tracker_types(&self) -> Result<Vec<CatalogEntry>> {
        let list: TrackerTypeList = self.get_json("trackers.json").await?;
        Ok(list.trackers)
    }

    async fn list_versions(&self) -> Result<Vec<CatalogEntry>> {
        let path = format!("projects/{}/versions.json", self.project);
        let list: VersionList = self.get_json(&path).await?;
        Ok(list.versions)
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn issue_url(&self, id: u64) -> String {
        format!("{}issues/{id}", self.base_url)
    }
}
