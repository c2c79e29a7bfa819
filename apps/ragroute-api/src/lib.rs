pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tokio::{net::TcpListener, task::JoinHandle, time::MissedTickBehavior};

use ragroute_service::RagService;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = ragroute_cli::VERSION,
	rename_all = "kebab",
	styles = ragroute_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = ragroute_config::load(&args.config)?;

	ragroute_cli::init_tracing(&config.service.log_level);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let sweep_interval = config.session.sweep_interval_secs;
	let state = AppState::new(config);

	if sweep_interval > 0 {
		spawn_session_sweeper(state.service.clone(), Duration::from_secs(sweep_interval));
	}

	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

/// Periodically drops idle sessions so abandoned users do not hold memory until the next
/// access.
pub fn spawn_session_sweeper(service: Arc<RagService>, every: Duration) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(every);

		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		// The first tick completes immediately.
		ticker.tick().await;

		loop {
			ticker.tick().await;

			let removed = service.sessions.sweep_idle();

			if removed > 0 {
				let remaining = service.sessions.len();

				tracing::debug!(removed, remaining, "Swept idle sessions.");
			}
		}
	})
}
