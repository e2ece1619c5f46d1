use std::sync::Arc;

use common::http::RouteError;
use hyper::server::conn::Http;
use hyper::{Body, Request, Response, StatusCode};
use routerify::{RequestServiceBuilder, Router};
use tokio::net::TcpSocket;
use tokio::select;

use self::error::{ApiError, Result};
use crate::global::ApiGlobal;

mod activity;
mod error;
mod health;
mod notifications;

async fn not_found(_: Request<Body>) -> Result<Response<Body>> {
	Err(RouteError::new(StatusCode::NOT_FOUND, "Not Found"))
}

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> anyhow::Result<Router<Body, RouteError<ApiError>>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		.err_handler_with_info(common::http::error_handler::<ApiError>)
		.get("/health", health::health)
		.get("/user/:id/notifications", notifications::list::<G>)
		.post("/activity", activity::create::<G>)
		.any(not_found)
		.build()
		.map_err(|err| anyhow::anyhow!("failed to build router: {err}"))
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let bind_address = global.config().api.bind_address;

	tracing::info!("listening on {}", bind_address);
	let socket = if bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.set_reuseport(true)?;
	socket.bind(bind_address)?;
	let listener = socket.listen(1024)?;

	// Handlers hold a Weak reference to the global state so open keep-alive
	// connections never keep it alive past shutdown.
	let request_service = RequestServiceBuilder::new(routes(&global)?)
		.map_err(|err| anyhow::anyhow!("failed to build request service: {err}"))?;

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;
				let service = request_service.build(addr);

				tracing::debug!("accepted connection from {}", addr);

				tokio::spawn(async move {
					if let Err(err) = Http::new().serve_connection(socket, service).await {
						tracing::debug!(error = %err, "connection closed with error");
					}
				});
			},
		}
	}
}
