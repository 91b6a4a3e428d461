// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Foundry server binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use foundry_server::{create_router, AppState};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const OAUTH_STATE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Foundry server - federated sign-in over GitHub.
#[derive(Parser, Debug)]
#[command(name = "foundry-server", about = "Foundry sign-in server", version)]
struct Args {
	/// Path to a TOML config file.
	#[arg(long, env = "FOUNDRY_SERVER_CONFIG")]
	config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	dotenvy::dotenv().ok();

	let config = foundry_server_config::load_config(args.config.as_deref())?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting foundry-server"
	);

	let pool =
		foundry_server_db::create_pool(&config.database.url, config.database.max_connections).await?;
	foundry_server_db::ensure_schema(&pool).await?;

	let state = AppState::from_config(pool, &config)?;

	let sweeper = Arc::new(state.orphan_sweeper(&config));
	let sweep_task = sweeper.spawn(config.federation.orphan_sweep_interval);
	let cleanup_task = state
		.oauth_state_store
		.clone()
		.spawn_cleanup(OAUTH_STATE_CLEANUP_INTERVAL);

	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.http.bind_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	sweep_task.abort();
	cleanup_task.abort();
	tracing::info!("Server shutdown complete");
	Ok(())
}
