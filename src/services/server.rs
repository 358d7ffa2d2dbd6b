use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::AppConfig;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let state = Arc::new(AppState::new(self.config.clone()));
        let app = create_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
