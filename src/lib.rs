//! # wp-meta-rs
//!
//! SEO meta description generation and content analysis for WordPress.
//!
//! The [`seo`] module holds the text pipeline. It is exposed to MCP clients
//! over stdio ([`mcp`]) and to the WordPress admin plugin over HTTP
//! ([`http_server`]).

pub mod config;
pub mod error;
pub mod http_server;
pub mod logging;
pub mod mcp;
pub mod seo;

pub use error::{Error, Result};
pub use seo::MetaGenerator;
