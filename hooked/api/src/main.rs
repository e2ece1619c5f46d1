use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use common::context::Context;
use common::{logging, signal};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use tokio::signal::unix::SignalKind;
use tokio::{select, time};

mod activity;
mod api;
mod config;
mod database;
mod fixtures;
mod global;
mod notification;
mod push;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<()> {
	let config = config::AppConfig::parse()?;

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = %file, "loaded config from file");
	}

	tracing::debug!("config: {:#?}", config);

	let db = PgPoolOptions::new()
		.max_connections(config.database.max_connections)
		.connect_with(
			PgConnectOptions::from_str(&config.database.uri)
				.context("invalid database uri")?
				.disable_statement_logging(),
		)
		.await
		.context("failed to connect to database")?;

	tracing::info!("connected to database");

	database::schema::create(&db).await.context("failed to create schema")?;

	if let Some(path) = &config.fixtures.path {
		let fixtures = fixtures::Fixtures::read(path).await.map_err(|err| {
			tracing::error!(event = "load-fixtures", path = %path, error = %err, "failed to read fixtures");
			err
		})?;

		let summary = fixtures::load(&db, &fixtures).await.map_err(|err| {
			tracing::error!(event = "load-fixtures", path = %path, error = %err, "failed to load fixtures");
			err
		})?;

		tracing::info!(
			users = summary.users,
			stories = summary.stories,
			activities = summary.activities,
			notifications = summary.notifications,
			follower_edges = summary.follower_edges,
			"loaded fixtures"
		);

		if config.fixtures.exit {
			return Ok(());
		}
	}

	let (ctx, handler) = Context::new();

	let (dispatcher, worker) = push::channel(push::ConsoleSink);

	let global = Arc::new(global::GlobalState::new(
		ctx.clone(),
		config,
		database::PgStore::new(db),
		dispatcher,
	));

	tracing::info!("starting");

	let api_future = tokio::spawn(api::run(global.clone()));
	let push_future = tokio::spawn(worker.run(ctx));

	// Listen on both sigint and sigterm and cancel the context when either is received
	let mut signal_handler = signal::SignalHandler::new()
		.with_signal(SignalKind::interrupt())?
		.with_signal(SignalKind::terminate())?;

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		r = push_future => tracing::error!("push worker stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	// We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
	drop(global);

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}
