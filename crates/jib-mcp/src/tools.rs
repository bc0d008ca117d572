//! MCP tool implementations.
//!
//! This module contains the implementations for all MCP tools exposed by
//! the server. Each method normalizes its arguments, converts markdown
//! to ADF where a description or comment body is involved, and makes the
//! corresponding client call.

use std::path::Path;
use std::sync::Arc;

use jib::alias::resolve_pod;
use jib::client::{Attachment, IssueUpdate, NewIssue};
use jib::JiraClient;

use crate::error::{Error, Result};
use crate::models::{
    AddCommentResponse, CreateIssueParams, CreateIssueResponse, DownloadAttachmentResponse,
    McpAttachment, McpIssue, SearchIssuesParams, UpdateIssueParams,
};

/// Default number of search hits when the caller does not say.
const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Tool implementations for the jib MCP server.
pub struct Tools {
    client: Arc<JiraClient>,
}

impl Tools {
    /// Create a new Tools instance backed by the given client.
    #[must_use]
    pub fn new(client: Arc<JiraClient>) -> Self {
        Self { client }
    }

    /// Fetch one issue as a flattened view.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the request fails.
    pub async fn get_issue(&self, key: &str) -> Result<McpIssue> {
        let issue = self.client.get_issue(key).await?;
        let url = self.client.browse_url(&issue.key);
        Ok(McpIssue::from_issue(issue, url))
    }

    /// Search issues, either by raw JQL or by assembled filters.
    ///
    /// # Errors
    ///
    /// Returns an error if Jira rejects the JQL or the request fails.
    pub async fn search_issues(&self, params: SearchIssuesParams) -> Result<Vec<McpIssue>> {
        let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let jql = match &params.jql {
            Some(raw) => raw.clone(),
            None => build_jql(&params),
        };
        let issues = self.client.search(&jql, limit).await?;
        Ok(issues
            .into_iter()
            .map(|issue| {
                let url = self.client.browse_url(&issue.key);
                McpIssue::from_issue(issue, url)
            })
            .collect())
    }

    /// Create an issue; the description is markdown.
    ///
    /// # Errors
    ///
    /// Returns an error when no project is given or configured, or when
    /// Jira rejects the fields.
    pub async fn create_issue(&self, params: CreateIssueParams) -> Result<CreateIssueResponse> {
        let project = params
            .project
            .or_else(|| self.client.default_project().map(str::to_string))
            .ok_or(Error::InvalidArgument {
                field: "project",
                value: String::new(),
                hint: "Pass a project key or set JIRA_DEFAULT_PROJECT.",
            })?;

        let new_issue = NewIssue {
            project,
            issue_type: params.issue_type.unwrap_or_else(|| "Task".to_string()),
            summary: params.summary,
            description: params.description,
            labels: params.labels.unwrap_or_default(),
        };

        let created = self.client.create_issue(&new_issue).await?;
        let url = self.client.browse_url(&created.key);
        Ok(CreateIssueResponse {
            key: created.key,
            id: created.id,
            url,
        })
    }

    /// Update an issue's summary, description (markdown), or labels.
    ///
    /// # Errors
    ///
    /// Returns an error when no field is given or the request fails.
    pub async fn update_issue(&self, params: UpdateIssueParams) -> Result<McpIssue> {
        if params.summary.is_none() && params.description.is_none() && params.labels.is_none() {
            return Err(Error::InvalidArgument {
                field: "update",
                value: params.key,
                hint: "Pass at least one of summary, description, labels.",
            });
        }

        let update = IssueUpdate {
            summary: params.summary,
            description: params.description,
            labels: params.labels,
        };
        self.client.update_issue(&params.key, &update).await?;
        self.get_issue(&params.key).await
    }

    /// Add a markdown comment to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the request fails.
    pub async fn add_comment(&self, key: &str, body: &str) -> Result<AddCommentResponse> {
        let comment = self.client.add_comment(key, body).await?;
        Ok(AddCommentResponse {
            id: comment.id,
            key: key.to_string(),
        })
    }

    /// List attachment metadata for an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the request fails.
    pub async fn list_attachments(&self, key: &str) -> Result<Vec<McpAttachment>> {
        let issue = self.client.get_issue(key).await?;
        Ok(issue
            .fields
            .attachment
            .into_iter()
            .map(McpAttachment::from)
            .collect())
    }

    /// Download one attachment's content to a local path.
    ///
    /// # Errors
    ///
    /// Returns an error when no attachment matches the selector, or when
    /// the download or the local write fails.
    pub async fn download_attachment(
        &self,
        key: &str,
        attachment_id: Option<&str>,
        filename: Option<&str>,
        output_path: &str,
    ) -> Result<DownloadAttachmentResponse> {
        let issue = self.client.get_issue(key).await?;
        let attachment =
            select_attachment(&issue.fields.attachment, attachment_id, filename).ok_or_else(
                || Error::AttachmentNotFound {
                    key: key.to_string(),
                    selector: attachment_id
                        .or(filename)
                        .unwrap_or("the only attachment")
                        .to_string(),
                },
            )?;

        let bytes = self
            .client
            .download_attachment(&attachment.content, Path::new(output_path))
            .await?;
        Ok(DownloadAttachmentResponse {
            filename: attachment.filename.clone(),
            path: output_path.to_string(),
            bytes,
        })
    }

    /// Upload a local file as an attachment.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or the request
    /// fails.
    pub async fn upload_attachment(&self, key: &str, file_path: &str) -> Result<Vec<McpAttachment>> {
        let uploaded = self
            .client
            .upload_attachment(key, Path::new(file_path))
            .await?;
        Ok(uploaded.into_iter().map(McpAttachment::from).collect())
    }
}

/// Assemble JQL from the semantic search arguments.
///
/// Clauses are ANDed in a fixed order; results are newest-updated first.
/// With no filters at all, the query is just the ordering.
pub(crate) fn build_jql(params: &SearchIssuesParams) -> String {
    let mut clauses = Vec::new();
    if let Some(project) = &params.project {
        clauses.push(format!("project = {}", quote(project)));
    }
    if let Some(pod) = &params.pod {
        clauses.push(format!("pod = {}", quote(resolve_pod(pod))));
    }
    if let Some(assignee) = &params.assignee {
        clauses.push(format!("assignee = {}", quote(assignee)));
    }
    if let Some(status) = &params.status {
        clauses.push(format!("status = {}", quote(status)));
    }
    if let Some(text) = &params.text {
        clauses.push(format!("text ~ {}", quote(text)));
    }

    if clauses.is_empty() {
        "ORDER BY updated DESC".to_string()
    } else {
        format!("{} ORDER BY updated DESC", clauses.join(" AND "))
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Pick an attachment by id, then filename; with no selector, only an
/// unambiguous single attachment matches.
fn select_attachment<'a>(
    attachments: &'a [Attachment],
    attachment_id: Option<&str>,
    filename: Option<&str>,
) -> Option<&'a Attachment> {
    if let Some(id) = attachment_id {
        return attachments.iter().find(|a| a.id == id);
    }
    if let Some(name) = filename {
        return attachments.iter().find(|a| a.filename == name);
    }
    match attachments {
        [only] => Some(only),
        _ => None,
    }
}
