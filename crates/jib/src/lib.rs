//! Jib - a Jira bridge core.
//!
//! This crate provides the pieces the MCP surface is built from: a
//! markdown-to-ADF converter, a thin async client for the Jira Cloud
//! REST API, environment-based configuration, and the pod alias table
//! used when assembling JQL.

#![forbid(unsafe_code)]

pub mod adf;
pub mod alias;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;

pub use client::JiraClient;
pub use config::Config;
pub use error::{Error, Result};
