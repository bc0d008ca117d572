//! MCP server implementation.
//!
//! This module contains the main server setup using rmcp.

use crate::error::Error;
use crate::models::{
    AddCommentParams, CreateIssueParams, DownloadAttachmentParams, GetIssueParams,
    ListAttachmentsParams, SearchIssuesParams, UpdateIssueParams, UploadAttachmentParams,
};
use crate::tools::Tools;
use jib::JiraClient;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::transport::stdio;
use rmcp::{
    handler::server::ServerHandler, tool, tool_handler, tool_router, ErrorData as McpError,
    ServiceExt,
};
use std::sync::Arc;

/// The jib MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct JibMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl JibMcpServer {
    /// Fetch a single issue.
    #[tool(
        description = "Get one issue by key, including status, people, labels, custom fields, and the description as plain text."
    )]
    async fn get_issue(
        &self,
        Parameters(params): Parameters<GetIssueParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tools.get_issue(&params.key).await {
            Ok(issue) => Ok(CallToolResult::success(vec![Content::json(issue)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Search issues.
    #[tool(
        description = "Search issues by raw JQL or by filters (project, pod, assignee, status, free text). Pod names may be shorthand aliases."
    )]
    async fn search_issues(
        &self,
        Parameters(params): Parameters<SearchIssuesParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tools.search_issues(params).await {
            Ok(issues) => Ok(CallToolResult::success(vec![Content::json(issues)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Create a new issue.
    #[tool(
        description = "Create an issue. The description is markdown (headings, bold/italic/strike/code, links, lists, code fences) and is converted to Jira's document format."
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tools.create_issue(params).await {
            Ok(created) => Ok(CallToolResult::success(vec![Content::json(created)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Update an existing issue.
    #[tool(
        description = "Update an issue's summary, markdown description, or labels. Returns the refreshed issue."
    )]
    async fn update_issue(
        &self,
        Parameters(params): Parameters<UpdateIssueParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tools.update_issue(params).await {
            Ok(issue) => Ok(CallToolResult::success(vec![Content::json(issue)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Add a comment to an issue.
    #[tool(description = "Add a comment to an issue. The body is markdown.")]
    async fn add_comment(
        &self,
        Parameters(params): Parameters<AddCommentParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tools.add_comment(&params.key, &params.body).await {
            Ok(comment) => Ok(CallToolResult::success(vec![Content::json(comment)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// List attachments on an issue.
    #[tool(description = "List attachment metadata (id, filename, type, size) for an issue.")]
    async fn list_attachments(
        &self,
        Parameters(params): Parameters<ListAttachmentsParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tools.list_attachments(&params.key).await {
            Ok(attachments) => Ok(CallToolResult::success(vec![Content::json(attachments)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Download an attachment to a local file.
    #[tool(
        description = "Download an attachment's content to a local path, selected by id or filename (or the only attachment when unambiguous)."
    )]
    async fn download_attachment(
        &self,
        Parameters(params): Parameters<DownloadAttachmentParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self
            .tools
            .download_attachment(
                &params.key,
                params.attachment_id.as_deref(),
                params.filename.as_deref(),
                &params.output_path,
            )
            .await
        {
            Ok(response) => Ok(CallToolResult::success(vec![Content::json(response)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    /// Upload a local file as an attachment.
    #[tool(description = "Upload a local file as an attachment on an issue.")]
    async fn upload_attachment(
        &self,
        Parameters(params): Parameters<UploadAttachmentParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self
            .tools
            .upload_attachment(&params.key, &params.file_path)
            .await
        {
            Ok(attachments) => Ok(CallToolResult::success(vec![Content::json(attachments)?])),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }
}

impl JibMcpServer {
    /// Create a new jib MCP server around a configured client.
    #[must_use]
    pub fn new(client: Arc<JiraClient>) -> Self {
        Self {
            tools: Arc::new(Tools::new(client)),
            tool_router: Self::tool_router(),
        }
    }

    /// Serve the MCP protocol over stdio until the peer disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to start or shuts down
    /// abnormally.
    pub async fn run(self) -> crate::error::Result<()> {
        let service = self
            .serve(stdio())
            .await
            .map_err(|e| Error::Mcp(e.to_string()))?;
        service
            .waiting()
            .await
            .map_err(|e| Error::Mcp(e.to_string()))?;
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for JibMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "jib-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Jib MCP server bridging Jira. Descriptions and comment bodies are markdown."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jib::Config;
    use rmcp::handler::server::ServerHandler;

    fn test_server() -> JibMcpServer {
        let config = Config {
            base_url: "https://example.atlassian.net".to_string(),
            email: "dev@example.com".to_string(),
            api_token: "token".to_string(),
            default_project: Some("PROJ".to_string()),
        };
        let client = JiraClient::new(config).expect("client should build");
        JibMcpServer::new(Arc::new(client))
    }

    #[test]
    fn test_server_info() {
        let server = test_server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "jib-mcp");
        assert!(!info.server_info.version.is_empty());
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_tool_router_has_all_tools() {
        let server = test_server();
        let tools = server.tool_router.list_all();

        let tool_names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();

        assert!(tool_names.contains(&"get_issue"));
        assert!(tool_names.contains(&"search_issues"));
        assert!(tool_names.contains(&"create_issue"));
        assert!(tool_names.contains(&"update_issue"));
        assert!(tool_names.contains(&"add_comment"));
        assert!(tool_names.contains(&"list_attachments"));
        assert!(tool_names.contains(&"download_attachment"));
        assert!(tool_names.contains(&"upload_attachment"));
        assert_eq!(tools.len(), 8);
    }
}
