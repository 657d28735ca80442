pub mod api;

use std::error::Error;
use std::sync::Arc;

use crate::cli::Args;
use crate::engine::OracleEngine;

pub struct Server {
    addr: String,
    engine: Arc<OracleEngine>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, engine: Arc<OracleEngine>, args: Args) -> Self {
        Self { addr, engine, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = api::AppState { engine: self.engine.clone() };
        api::start_http_server(&self.addr, state, &self.args).await
    }
}
