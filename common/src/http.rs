use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::panic::Location;

use hyper::{Body, Response, StatusCode};
use routerify::RequestInfo;
use serde_json::json;

/// Builds a JSON response from anything that renders to a JSON string.
#[macro_export]
macro_rules! make_response {
	($status:expr, $body:expr) => {
		::hyper::Response::builder()
			.status($status)
			.header(::hyper::header::CONTENT_TYPE, "application/json; charset=UTF-8")
			.body(::hyper::Body::from($body.to_string()))
			.expect("failed to build response")
	};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShouldLog {
	Yes,
	Debug,
	No,
}

/// A failed request: the status and message sent to the client plus the
/// error that caused it, if any.
pub struct RouteError<E> {
	status: StatusCode,
	message: Cow<'static, str>,
	source: Option<E>,
	location: &'static Location<'static>,
	span: tracing::Span,
}

impl<E> RouteError<E> {
	#[track_caller]
	pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			status,
			message: message.into(),
			source: None,
			location: Location::caller(),
			span: tracing::Span::current(),
		}
	}

	pub fn with_source(mut self, source: E) -> Self {
		self.source = Some(source);
		self
	}

	pub fn with_location(mut self, location: &'static Location<'static>) -> Self {
		self.location = location;
		self
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn source_error(&self) -> Option<&E> {
		self.source.as_ref()
	}

	pub fn location(&self) -> &'static Location<'static> {
		self.location
	}

	pub fn span(&self) -> &tracing::Span {
		&self.span
	}

	pub fn should_log(&self) -> ShouldLog {
		if self.status.is_server_error() {
			ShouldLog::Yes
		} else if self.source.is_some() {
			ShouldLog::Debug
		} else {
			ShouldLog::No
		}
	}

	pub fn response(&self) -> Response<Body> {
		make_response!(self.status, json!({ "message": self.message, "success": false }))
	}
}

impl<E, S: Into<Cow<'static, str>>> From<(StatusCode, S)> for RouteError<E> {
	#[track_caller]
	fn from((status, message): (StatusCode, S)) -> Self {
		Self::new(status, message)
	}
}

impl<E, S: Into<Cow<'static, str>>, T: Into<E>> From<(StatusCode, S, T)> for RouteError<E> {
	#[track_caller]
	fn from((status, message, source): (StatusCode, S, T)) -> Self {
		Self::new(status, message).with_source(source.into())
	}
}

impl<E: Debug> Debug for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "RouteError({}): {:?}", self.status, err),
			None => write!(f, "RouteError({}): {}", self.status, self.message),
		}
	}
}

impl<E: Display> Display for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "{}: {}", self.message, err),
			None => write!(f, "{}", self.message),
		}
	}
}

impl<E: std::error::Error + 'static> std::error::Error for RouteError<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
	}
}

/// Router error handler: logs the error inside the span it was raised in
/// and renders its response.
pub async fn error_handler<E: std::error::Error + 'static>(
	err: Box<dyn std::error::Error + Send + Sync + 'static>,
	info: RequestInfo,
) -> Response<Body> {
	match err.downcast::<RouteError<E>>() {
		Ok(err) => {
			let location = err.location().to_string();

			err.span().in_scope(|| match err.should_log() {
				ShouldLog::Yes => {
					tracing::error!(path = %info.uri(), method = %info.method(), location = %location, error = ?err, "http error")
				}
				ShouldLog::Debug => {
					tracing::debug!(path = %info.uri(), method = %info.method(), location = %location, error = ?err, "http error")
				}
				ShouldLog::No => (),
			});

			err.response()
		}
		Err(err) => {
			tracing::error!(path = %info.uri(), method = %info.method(), error = ?err, "unhandled http error");
			make_response!(
				StatusCode::INTERNAL_SERVER_ERROR,
				json!({ "message": "Internal Server Error", "success": false })
			)
		}
	}
}

pub mod ext {
	use std::panic::Location;
	use std::sync::{Arc, Weak};

	use hyper::StatusCode;
	use routerify::ext::RequestExt;

	use super::RouteError;

	pub trait ResultExt<T, E> {
		/// Replaces the error with a route error built from `ctx`, keeping
		/// the original error as its source.
		fn map_err_route<C, E2>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
			E2: From<E>;
	}

	impl<T, E> ResultExt<T, E> for Result<T, E> {
		#[track_caller]
		fn map_err_route<C, E2>(self, ctx: C) -> Result<T, RouteError<E2>>
		where
			RouteError<E2>: From<C>,
			E2: From<E>,
		{
			let location = Location::caller();
			self.map_err(|err| RouteError::from(ctx).with_source(err.into()).with_location(location))
		}
	}

	pub trait OptionExt<T> {
		fn map_err_route<C, E>(self, ctx: C) -> Result<T, RouteError<E>>
		where
			RouteError<E>: From<C>;
	}

	impl<T> OptionExt<T> for Option<T> {
		#[track_caller]
		fn map_err_route<C, E>(self, ctx: C) -> Result<T, RouteError<E>>
		where
			RouteError<E>: From<C>,
		{
			let location = Location::caller();
			self.ok_or_else(|| RouteError::from(ctx).with_location(location))
		}
	}

	/// Access to the shared state registered on the router as a `Weak<G>`.
	pub trait RequestGlobalExt {
		fn get_global<G: Send + Sync + 'static, E>(&self) -> Result<Arc<G>, RouteError<E>>;
	}

	impl RequestGlobalExt for hyper::Request<hyper::Body> {
		#[track_caller]
		fn get_global<G: Send + Sync + 'static, E>(&self) -> Result<Arc<G>, RouteError<E>> {
			self.data::<Weak<G>>()
				.and_then(Weak::upgrade)
				.ok_or_else(|| RouteError::new(StatusCode::INTERNAL_SERVER_ERROR, "global state is unavailable"))
		}
	}
}
