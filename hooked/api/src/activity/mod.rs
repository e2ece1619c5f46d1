use chrono::{DateTime, Utc};

use crate::database::{empty_as_none, Store};
use crate::push::{PushDispatcher, PushMessage};

mod error;
mod fanout;
mod validate;

pub use error::*;
pub use fanout::*;
pub use validate::*;

/// The body of `POST /activity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ActivityRequest {
	#[serde(default)]
	pub action: String,
	/// When the action happened, the server clock is used when omitted.
	#[serde(default)]
	pub date: Option<DateTime<Utc>>,
	#[serde(default, deserialize_with = "empty_as_none")]
	pub actor: Option<String>,
	#[serde(default, deserialize_with = "empty_as_none")]
	pub user2: Option<String>,
	#[serde(default, deserialize_with = "empty_as_none")]
	pub story: Option<String>,
}

/// Validates and saves an activity together with its fan-out, then hands the
/// push notification to the dispatcher without waiting for delivery.
pub async fn create<S: Store + ?Sized>(
	store: &S,
	push: &PushDispatcher,
	request: ActivityRequest,
) -> Result<FanOutSummary, ActivityError> {
	let validated = validate(store, &request).await.map_err(|err| {
		match &err {
			ActivityError::Validation(err) => tracing::warn!(event = "validate-activity", error = %err, "rejected activity"),
			ActivityError::Persistence(err) => tracing::error!(event = "validate-activity", error = %err, "failed to validate activity"),
		}
		err
	})?;

	let activity = validated.to_activity(request.date.unwrap_or_else(Utc::now));

	let summary = store.save_activity(&activity).await.map_err(|err| {
		tracing::error!(event = "save-activity", activity_id = %activity.id, error = %err, "failed to save activity");
		err
	})?;

	tracing::debug!(
		activity_id = %activity.id,
		action = %activity.action,
		notifications = summary.created_notifications,
		follower_edges = summary.follower_edges_touched,
		"saved activity"
	);

	let message = PushMessage::for_activity(&validated, &summary.recipients);
	if let Err(err) = push.dispatch(message) {
		// Already committed, push failures never fail the request.
		tracing::error!(event = "push-notification", activity_id = %activity.id, error = %err, "failed to schedule push notification");
	}

	Ok(summary)
}
