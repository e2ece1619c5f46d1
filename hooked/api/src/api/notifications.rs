use common::http::ext::{OptionExt, RequestGlobalExt, ResultExt};
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::ext::RequestExt;

use super::error::{ApiError, Result};
use crate::global::ApiGlobal;
use crate::notification::{self, ReadError};

/// `GET /user/:id/notifications`
pub async fn list<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = req.get_global::<G, ApiError>()?;

	let user_id = req
		.param("id")
		.filter(|id| !id.is_empty())
		.cloned()
		.map_err_route((StatusCode::BAD_REQUEST, "Bad request: missing user id"))?;

	let notifications = match notification::list_for_user(global.store(), &user_id).await {
		Ok(notifications) => notifications,
		Err(ReadError::NotFound(err)) => {
			tracing::debug!(event = "get-notifications", user_id = %user_id, error = %err, "unknown user");
			return Err(RouteError::from((
				StatusCode::BAD_REQUEST,
				format!("Bad request: {err}"),
				ReadError::from(err),
			)));
		}
		Err(err) => {
			tracing::error!(event = "get-notifications", user_id = %user_id, error = %err, "failed to read notifications");
			return Err(RouteError::from((
				StatusCode::INTERNAL_SERVER_ERROR,
				"Could not get notifications",
				err,
			)));
		}
	};

	let body = serde_json::to_string_pretty(&notifications)
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "Could not encode notifications"))?;

	Ok(make_response!(StatusCode::OK, body))
}
