//! MCP parameter and response models.
//!
//! Parameter structs carry the JSON schemas the tools advertise; doc
//! comments become field descriptions. Response types flatten the
//! client's issue shapes for MCP transport.

use jib::adf;
use jib::client::{Attachment, Issue};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `get_issue` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIssueParams {
    /// Issue key, for example "PROJ-123".
    pub key: String,
}

/// Parameters for the `search_issues` tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchIssuesParams {
    /// Raw JQL. When set, the other filter arguments are ignored.
    pub jql: Option<String>,

    /// Free-text match against summary and description.
    pub text: Option<String>,

    /// Project key filter.
    pub project: Option<String>,

    /// Pod name or shorthand alias (e.g. "infra" for Infrastructure).
    pub pod: Option<String>,

    /// Assignee display name or account id.
    pub assignee: Option<String>,

    /// Status name, for example "In Progress".
    pub status: Option<String>,

    /// Maximum number of issues to return (default 50).
    pub limit: Option<usize>,
}

/// Parameters for the `create_issue` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIssueParams {
    /// Project key; falls back to JIRA_DEFAULT_PROJECT when omitted.
    pub project: Option<String>,

    /// Issue type name (default "Task").
    pub issue_type: Option<String>,

    /// One-line summary.
    pub summary: String,

    /// Description in markdown (headings, bold/italic/strike/code,
    /// links, lists, code fences).
    pub description: Option<String>,

    /// Labels to set on creation.
    pub labels: Option<Vec<String>>,
}

/// Parameters for the `update_issue` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateIssueParams {
    /// Issue key to update.
    pub key: String,

    /// Replacement summary.
    pub summary: Option<String>,

    /// Replacement description in markdown.
    pub description: Option<String>,

    /// Replacement label set.
    pub labels: Option<Vec<String>>,
}

/// Parameters for the `add_comment` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddCommentParams {
    /// Issue key to comment on.
    pub key: String,

    /// Comment body in markdown.
    pub body: String,
}

/// Parameters for the `list_attachments` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAttachmentsParams {
    /// Issue key to list attachments for.
    pub key: String,
}

/// Parameters for the `download_attachment` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DownloadAttachmentParams {
    /// Issue key the attachment belongs to.
    pub key: String,

    /// Attachment id to download; takes precedence over `filename`.
    pub attachment_id: Option<String>,

    /// Attachment filename to download. When both selectors are omitted
    /// and the issue has exactly one attachment, that one is taken.
    pub filename: Option<String>,

    /// Path the content is written to.
    pub output_path: String,
}

/// Parameters for the `upload_attachment` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadAttachmentParams {
    /// Issue key to attach the file to.
    pub key: String,

    /// Path of the file to upload.
    pub file_path: String,
}

/// Issue representation for MCP responses.
///
/// A flattened view of an issue optimized for MCP transport: name-bearing
/// objects reduce to their names, the ADF description reduces to plain
/// text, custom fields to rendered strings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpIssue {
    /// Issue key.
    pub key: String,

    /// One-line summary.
    pub summary: String,

    /// Workflow status name.
    pub status: Option<String>,

    /// Issue type name.
    pub issue_type: Option<String>,

    /// Priority name.
    pub priority: Option<String>,

    /// Assignee display name.
    pub assignee: Option<String>,

    /// Reporter display name.
    pub reporter: Option<String>,

    /// Labels.
    pub labels: Vec<String>,

    /// Creation timestamp, as Jira formats it.
    pub created: Option<String>,

    /// Last-update timestamp, as Jira formats it.
    pub updated: Option<String>,

    /// Description flattened to plain text, if present.
    pub description: Option<String>,

    /// Custom fields rendered as text, keyed by field id.
    pub custom_fields: Vec<(String, String)>,

    /// Browse URL for the issue.
    pub url: String,
}

impl McpIssue {
    /// Flatten a client issue, attaching its browse URL.
    #[must_use]
    pub fn from_issue(issue: Issue, url: String) -> Self {
        let fields = issue.fields;
        Self {
            key: issue.key,
            summary: fields.summary.clone(),
            status: fields.status.as_ref().map(|n| n.name.clone()),
            issue_type: fields.issue_type.as_ref().map(|n| n.name.clone()),
            priority: fields.priority.as_ref().map(|n| n.name.clone()),
            assignee: fields.assignee.as_ref().map(|u| u.display_name.clone()),
            reporter: fields.reporter.as_ref().map(|u| u.display_name.clone()),
            labels: fields.labels.clone(),
            created: fields.created.clone(),
            updated: fields.updated.clone(),
            description: fields.description.as_ref().map(adf::plain_text),
            custom_fields: fields.custom_fields(),
            url,
        }
    }
}

/// Attachment representation for MCP responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpAttachment {
    /// Attachment id.
    pub id: String,

    /// Original filename.
    pub filename: String,

    /// MIME type, if known.
    pub mime_type: Option<String>,

    /// Size in bytes.
    pub size: u64,

    /// Creation timestamp, as Jira formats it.
    pub created: Option<String>,
}

impl From<Attachment> for McpAttachment {
    fn from(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            filename: attachment.filename,
            mime_type: attachment.mime_type,
            size: attachment.size,
            created: attachment.created,
        }
    }
}

/// Response from the `create_issue` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateIssueResponse {
    /// The new issue's key.
    pub key: String,

    /// The new issue's numeric id.
    pub id: String,

    /// Browse URL for the new issue.
    pub url: String,
}

/// Response from the `add_comment` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddCommentResponse {
    /// The new comment's id.
    pub id: String,

    /// The issue that was commented on.
    pub key: String,
}

/// Response from the `download_attachment` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DownloadAttachmentResponse {
    /// The attachment that was downloaded.
    pub filename: String,

    /// Where the content was written.
    pub path: String,

    /// Number of bytes written.
    pub bytes: usize,
}
