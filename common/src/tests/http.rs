use hyper::StatusCode;

use crate::http::ext::{OptionExt, ResultExt};
use crate::http::{RouteError, ShouldLog};

#[derive(Debug, thiserror::Error)]
#[error("boom")]
struct Boom;

#[tokio::test]
async fn test_route_error_response() {
	let err: RouteError<Boom> = (StatusCode::BAD_REQUEST, "Bad request: nope").into();
	assert_eq!(err.status(), StatusCode::BAD_REQUEST);
	assert_eq!(err.should_log(), ShouldLog::No);

	let response = err.response();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		response.headers().get(hyper::header::CONTENT_TYPE).unwrap(),
		"application/json; charset=UTF-8"
	);

	let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
	let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(body, serde_json::json!({ "message": "Bad request: nope", "success": false }));
}

#[test]
fn test_should_log() {
	let err: RouteError<Boom> = (StatusCode::BAD_REQUEST, "bad", Boom).into();
	assert_eq!(err.should_log(), ShouldLog::Debug);

	let err: RouteError<Boom> = (StatusCode::INTERNAL_SERVER_ERROR, "failed").into();
	assert_eq!(err.should_log(), ShouldLog::Yes);
}

#[test]
fn test_ext() {
	let result: Result<(), Boom> = Err(Boom);
	let err = result.map_err_route::<_, Boom>((StatusCode::CONFLICT, "conflict")).unwrap_err();
	assert_eq!(err.status(), StatusCode::CONFLICT);
	assert!(err.source_error().is_some());
	assert_eq!(err.to_string(), "conflict: boom");

	let err = None::<()>.map_err_route::<_, Boom>((StatusCode::NOT_FOUND, "missing")).unwrap_err();
	assert_eq!(err.status(), StatusCode::NOT_FOUND);
	assert_eq!(err.message(), "missing");
}
