//! MCP server bridging Jira issue tracking.
//!
//! This crate provides an MCP (Model Context Protocol) server that
//! exposes Jira operations to AI assistants. Description and comment
//! arguments are written in a small markdown dialect and converted to
//! Jira's rich-document format (ADF) by the `jib` core before they go
//! on the wire.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling over
//! stdio and wraps the `JiraClient` from the jib crate.
//!
//! # Tools
//!
//! ## Issue Queries
//! - `get_issue` - Fetch one issue by key
//! - `search_issues` - Search by JQL or semantic filters (pod aliases
//!   resolve to full labels)
//!
//! ## Issue Modification
//! - `create_issue` - Create an issue with a markdown description
//! - `update_issue` - Update summary, description, or labels
//! - `add_comment` - Add a markdown comment
//!
//! ## Attachments
//! - `list_attachments` - List attachment metadata
//! - `download_attachment` - Save an attachment's content locally
//! - `upload_attachment` - Attach a local file

pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::JibMcpServer;
