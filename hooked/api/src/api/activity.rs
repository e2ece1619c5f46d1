use common::http::ext::{RequestGlobalExt, ResultExt};
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use serde_json::json;

use super::error::{ApiError, Result};
use crate::activity::{self, ActivityError, ActivityRequest};
use crate::global::ApiGlobal;

/// `POST /activity`
pub async fn create<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;

	let body = hyper::body::to_bytes(req.into_body())
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "Bad JSON body"))?;

	let request: ActivityRequest = serde_json::from_slice(&body).map_err(|err| {
		tracing::warn!(event = "json-decode", error = %err, "failed to decode activity");
		RouteError::from((StatusCode::BAD_REQUEST, "Bad JSON body", err))
	})?;

	match activity::create(global.store(), global.push(), request).await {
		Ok(_) => Ok(make_response!(StatusCode::OK, json!({ "msg": "OK" }))),
		Err(ActivityError::Validation(err)) => Err(RouteError::from((
			StatusCode::BAD_REQUEST,
			format!("Bad activity: {err}"),
			ActivityError::from(err),
		))),
		Err(err) => Err(RouteError::from((
			StatusCode::INTERNAL_SERVER_ERROR,
			"Could not save activity",
			err,
		))),
	}
}
