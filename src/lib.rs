use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;

pub mod config;
pub mod error;
pub mod game;
pub mod http;
pub mod request;
pub mod rng;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{GameError, StoreError};
pub use game::{Bounds, Game, PlayResult, Streak, neighbor_window};
pub use http::router;
pub use request::GameRequest;
pub use rng::{NumberSource, ScriptedNumbers, SeededSource, ThreadRngSource, rand_in_range};
pub use service::{ExactPlay, GameService, NeighborPlay};
pub use store::{GameStore, MemoryStore};

/// Build the service described by `config`: open the store (from its
/// snapshot if one is configured) and pick the number source.
pub fn build_service(config: &Config) -> Result<GameService> {
    let store = match &config.games_file {
        Some(path) => MemoryStore::open(path)?,
        None => MemoryStore::new(),
    };
    let numbers: Arc<dyn NumberSource> = match config.seed {
        Some(seed) => Arc::new(SeededSource::new(seed)),
        None => Arc::new(ThreadRngSource),
    };
    Ok(GameService::new(Arc::new(store), numbers))
}

/// Run the HTTP server. Separated from main so integration tests can import
/// the library.
pub async fn run_server() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("starting with {}", config);

    let service = build_service(&config)?;
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
