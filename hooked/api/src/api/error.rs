use common::http::RouteError;

use crate::activity::ActivityError;
use crate::notification::ReadError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to read http body: {0}")]
	ReadBody(#[from] hyper::Error),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("activity error: {0}")]
	Activity(#[from] ActivityError),
	#[error("notification error: {0}")]
	Notification(#[from] ReadError),
}
