//! Thin async client for the Jira Cloud REST API (v3).
//!
//! One method per operation, basic auth on every request, and a typed
//! error for non-success responses. Description and comment markup is
//! converted to ADF before it goes on the wire; responses are decoded
//! into the typed subset the bridge exposes.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::adf;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fields::FieldValue;

/// Page size cap for search requests.
const MAX_PAGE_SIZE: usize = 100;

/// Fields requested on search hits.
const SEARCH_FIELDS: &[&str] = &[
    "summary",
    "status",
    "issuetype",
    "priority",
    "assignee",
    "reporter",
    "labels",
    "created",
    "updated",
];

/// A Jira REST client bound to one site and one set of credentials.
pub struct JiraClient {
    http: reqwest::Client,
    config: Config,
}

impl JiraClient {
    /// Create a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("jib/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// The project key used when a create call does not name one.
    #[must_use]
    pub fn default_project(&self) -> Option<&str> {
        self.config.default_project.as_deref()
    }

    /// The browse URL for an issue key.
    #[must_use]
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.config.base_url)
    }

    /// Fetch a single issue with all fields.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status
    /// (404 for an unknown key surfaces as [`Error::Api`]).
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        debug!(key, "Fetching issue");
        let resp = self
            .http
            .get(self.url(&format!("rest/api/3/issue/{key}")))
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Search issues by JQL, paging through results until `limit` issues
    /// are collected or the result set is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status
    /// (malformed JQL comes back as a 400 with Jira's message).
    pub async fn search(&self, jql: &str, limit: usize) -> Result<Vec<Issue>> {
        let mut issues: Vec<Issue> = Vec::new();
        let mut start_at = 0usize;

        loop {
            let page_size = next_page_size(issues.len(), limit);
            debug!(jql, start_at, page_size, "Searching issues");
            let body = json!({
                "jql": jql,
                "startAt": start_at,
                "maxResults": page_size,
                "fields": SEARCH_FIELDS,
            });
            let resp = self
                .http
                .post(self.url("rest/api/3/search"))
                .basic_auth(&self.config.email, Some(&self.config.api_token))
                .json(&body)
                .send()
                .await?;
            let page: SearchPage = Self::check(resp).await?.json().await?;

            let fetched = page.issues.len();
            issues.extend(page.issues);
            start_at += fetched;

            if search_done(fetched, page_size, issues.len(), limit, start_at, page.total) {
                break;
            }
        }

        issues.truncate(limit);
        Ok(issues)
    }

    /// Create an issue; `description` is markdown, converted to ADF.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when Jira rejects the
    /// fields (unknown project, missing required field).
    pub async fn create_issue(&self, new_issue: &NewIssue) -> Result<CreatedIssue> {
        let mut fields = serde_json::Map::new();
        fields.insert("project".to_string(), json!({"key": new_issue.project}));
        fields.insert("issuetype".to_string(), json!({"name": new_issue.issue_type}));
        fields.insert("summary".to_string(), json!(new_issue.summary));
        if let Some(markdown) = &new_issue.description {
            fields.insert(
                "description".to_string(),
                serde_json::to_value(adf::convert(markdown))?,
            );
        }
        if !new_issue.labels.is_empty() {
            fields.insert("labels".to_string(), json!(new_issue.labels));
        }

        debug!(project = %new_issue.project, "Creating issue");
        let resp = self
            .http
            .post(self.url("rest/api/3/issue"))
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .json(&json!({"fields": fields}))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Update an issue's summary, description (markdown), or labels.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn update_issue(&self, key: &str, update: &IssueUpdate) -> Result<()> {
        let mut fields = serde_json::Map::new();
        if let Some(summary) = &update.summary {
            fields.insert("summary".to_string(), json!(summary));
        }
        if let Some(markdown) = &update.description {
            fields.insert(
                "description".to_string(),
                serde_json::to_value(adf::convert(markdown))?,
            );
        }
        if let Some(labels) = &update.labels {
            fields.insert("labels".to_string(), json!(labels));
        }

        debug!(key, "Updating issue");
        let resp = self
            .http
            .put(self.url(&format!("rest/api/3/issue/{key}")))
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .json(&json!({"fields": fields}))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Add a comment; `body` is markdown, converted to ADF.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn add_comment(&self, key: &str, body: &str) -> Result<Comment> {
        debug!(key, "Adding comment");
        let resp = self
            .http
            .post(self.url(&format!("rest/api/3/issue/{key}/comment")))
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .json(&json!({"body": adf::convert(body)}))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Download attachment content to `dest`, returning the byte count.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or
    /// when the destination cannot be written.
    pub async fn download_attachment(&self, content_url: &str, dest: &Path) -> Result<usize> {
        debug!(content_url, dest = %dest.display(), "Downloading attachment");
        let resp = self
            .http
            .get(content_url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .send()
            .await?;
        let bytes = Self::check(resp).await?.bytes().await?;
        write_attachment_file(dest, &bytes).await
    }

    /// Upload a file as an attachment on an issue.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, on transport
    /// failure, or on a non-success status.
    pub async fn upload_attachment(&self, key: &str, path: &Path) -> Result<Vec<Attachment>> {
        let (filename, data) = read_attachment_file(path).await?;
        debug!(key, filename, "Uploading attachment");
        let part = reqwest::multipart::Part::bytes(data).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .http
            .post(self.url(&format!("rest/api/3/issue/{key}/attachments")))
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .header("X-Atlassian-Token", "no-check")
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let status = status.as_u16();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.first_message(),
            Err(_) => format!("request failed with status {status}"),
        };
        Err(Error::Api { status, message })
    }
}

/// The page size for the next search request.
fn next_page_size(collected: usize, limit: usize) -> usize {
    limit.saturating_sub(collected).min(MAX_PAGE_SIZE)
}

/// Whether a search scan is finished after a page.
///
/// A short page means the result set is exhausted, whatever `total`
/// claims; `total` is advisory and only consulted when present.
fn search_done(
    fetched: usize,
    requested: usize,
    collected: usize,
    limit: usize,
    start_at: usize,
    total: Option<usize>,
) -> bool {
    fetched < requested || collected >= limit || total.is_some_and(|t| start_at >= t)
}

/// Write attachment content to `dest`, returning the byte count.
pub(crate) async fn write_attachment_file(dest: &Path, bytes: &[u8]) -> Result<usize> {
    tokio::fs::write(dest, bytes).await?;
    Ok(bytes.len())
}

/// Read an attachment file, yielding its basename and contents.
pub(crate) async fn read_attachment_file(path: &Path) -> Result<(String, Vec<u8>)> {
    let data = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());
    Ok((filename, data))
}

/// Fields for a new issue.
#[derive(Debug, Clone)]
pub struct NewIssue {
    /// Project key the issue is created in.
    pub project: String,
    /// Issue type name, e.g. "Task" or "Bug".
    pub issue_type: String,
    /// One-line summary.
    pub summary: String,
    /// Description in the markdown dialect, if any.
    pub description: Option<String>,
    /// Labels to set on creation.
    pub labels: Vec<String>,
}

/// Fields to change on an existing issue; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    /// Replacement summary.
    pub summary: Option<String>,
    /// Replacement description in the markdown dialect.
    pub description: Option<String>,
    /// Replacement label set.
    pub labels: Option<Vec<String>>,
}

/// An issue as returned by Jira.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue key, e.g. "PROJ-123".
    pub key: String,
    /// The issue's fields.
    pub fields: IssueFields,
}

/// The decoded field subset of an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueFields {
    /// One-line summary.
    #[serde(default)]
    pub summary: String,

    /// Workflow status.
    #[serde(default)]
    pub status: Option<Named>,

    /// Issue type.
    #[serde(default, rename = "issuetype")]
    pub issue_type: Option<Named>,

    /// Priority.
    #[serde(default)]
    pub priority: Option<Named>,

    /// Assignee, if any.
    #[serde(default)]
    pub assignee: Option<User>,

    /// Reporter, if any.
    #[serde(default)]
    pub reporter: Option<User>,

    /// Labels.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Creation timestamp, as Jira formats it.
    #[serde(default)]
    pub created: Option<String>,

    /// Last-update timestamp, as Jira formats it.
    #[serde(default)]
    pub updated: Option<String>,

    /// Attachments on the issue.
    #[serde(default)]
    pub attachment: Vec<Attachment>,

    /// Description as the ADF tree Jira returned, untouched.
    #[serde(default)]
    pub description: Option<Value>,

    /// Everything else, custom fields included, decoded once.
    #[serde(flatten)]
    pub rest: HashMap<String, FieldValue>,
}

impl IssueFields {
    /// Custom-field values rendered as text, keyed by field id, nulls
    /// dropped.
    #[must_use]
    pub fn custom_fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .rest
            .iter()
            .filter(|(key, value)| key.starts_with("customfield_") && !value.is_null())
            .map(|(key, value)| (key.clone(), value.as_text()))
            .collect();
        fields.sort();
        fields
    }
}

/// An object identified by a display name (status, type, priority).
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    /// The display name.
    #[serde(default)]
    pub name: String,
}

/// A Jira user reference.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// The user's display name.
    #[serde(default, rename = "displayName")]
    pub display_name: String,
}

/// Attachment metadata on an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Attachment id.
    pub id: String,
    /// Original filename.
    #[serde(default)]
    pub filename: String,
    /// MIME type, if known.
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Creation timestamp, as Jira formats it.
    #[serde(default)]
    pub created: Option<String>,
    /// URL the raw content is served from.
    #[serde(default)]
    pub content: String,
}

/// Response to a successful create call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    /// Numeric issue id.
    pub id: String,
    /// Issue key, e.g. "PROJ-124".
    pub key: String,
}

/// Response to a successful comment call.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// Comment id.
    pub id: String,
    /// Creation timestamp, as Jira formats it.
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    issues: Vec<Issue>,
    #[serde(default)]
    total: Option<usize>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "errorMessages")]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: HashMap<String, String>,
}

impl ErrorBody {
    fn first_message(self) -> String {
        if let Some(message) = self.error_messages.into_iter().next() {
            return message;
        }
        self.errors
            .into_iter()
            .next()
            .map_or_else(|| "unknown error".to_string(), |(field, message)| {
                format!("{field}: {message}")
            })
    }
}
