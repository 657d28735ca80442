pub mod cli;
pub mod engine;
pub mod error;
pub mod llm;
pub mod models;
pub mod personas;
pub mod server;

use cli::Args;
use engine::OracleEngine;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Generation API Base URL: {}", args.gemini_base_url);
    info!("Generation Timeout: {}s", args.generation_timeout_secs);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("Personas: {}", personas::ALL.iter().map(|p| p.id).collect::<Vec<_>>().join(", "));
    info!("-------------------------");

    let client = llm::new_client(&args)?;
    let engine = Arc::new(OracleEngine::new(client));
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, engine, args.clone());
    server.run().await?;

    Ok(())
}
