//! Runs the MCP server on stdio.

use super::open_library;
use crate::config::Config;
use crate::mcp::McpServer;
use crate::utils::error::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

pub fn handle_serve_command(config: Config) -> AppResult<()> {
    // stdout carries the protocol stream, so logs must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let library = open_library(&config)?;
    tracing::info!(
        database = %config.general.database_path.display(),
        "serving prompt library over MCP"
    );

    let mut server = McpServer::new(library);
    server
        .run()
        .map_err(|e| AppError::Storage(format!("stdio transport: {}", e)))
}
