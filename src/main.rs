//! EatWise
//!
//! An MCP server answering "should I eat this?" from a meal photo and health details.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use eatwise::build_info;
use eatwise::config::{ModelConfig, StoreConfig};
use eatwise::llm::HttpModelClient;
use eatwise::mcp::EatwiseService;
use eatwise::tools::advice::FoodAdvisor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("eatwise=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner("MCP Server");
    eprintln!("Starting MCP server on stdio...");

    let store_config = StoreConfig::from_env()?;
    match &store_config.database_path {
        Some(path) => eprintln!("Record store: sqlite ({})", path.display()),
        None => eprintln!("Record store: memory"),
    }
    let store = store_config.open_store()?;

    // Food analysis needs a key; everything else works without one
    let advisor = match ModelConfig::from_env() {
        Ok(config) => {
            eprintln!("Model: {} at {}", config.settings.model, config.endpoint.base_url);
            let client = HttpModelClient::new(config.endpoint)?;
            Some(FoodAdvisor::new(Arc::new(client), config.settings))
        }
        Err(e) => {
            warn!("food analysis disabled: {}", e);
            None
        }
    };

    let service = EatwiseService::new(store, advisor);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
