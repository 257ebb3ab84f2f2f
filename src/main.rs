//! `dashboard-embed` server binary.

// crates.io
use color_eyre::Result;
// self
use dashboard_embed::{
	config::ServerConfig,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	server::init_tracing();

	let config = ServerConfig::from_env()?;
	let state = AppState::from_config(&config)?;

	server::serve(state, config.port).await?;

	Ok(())
}
