//! Model Context Protocol surface: JSON-RPC types, the stdio server loop
//! and the meta description tool handler.

pub mod handler;
pub mod server;
pub mod types;

pub use handler::MetaToolHandler;
pub use server::*;
pub use types::*;
