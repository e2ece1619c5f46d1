use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

use crate::database::{Action, NotFoundError, Notification, PersistenceError, Store};

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
	#[error(transparent)]
	NotFound(#[from] NotFoundError),
	#[error("failed to read notifications: {0}")]
	Persistence(#[from] PersistenceError),
}

/// A notification as shown to the user receiving it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationView {
	pub action: Action,
	pub actor: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub story: Option<String>,
	/// For follows, the viewer as the followed user.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user2: Option<String>,
	#[serde(serialize_with = "serialize_date")]
	pub date: DateTime<Utc>,
}

fn serialize_date<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl NotificationView {
	pub fn new(viewer: &str, notification: Notification) -> Self {
		Self {
			user2: (notification.action == Action::Follow).then(|| viewer.to_string()),
			action: notification.action,
			actor: notification.actor_id,
			story: notification.story_id,
			date: notification.date,
		}
	}
}

/// Every notification for `user_id`, oldest first.
pub async fn list_for_user<S: Store + ?Sized>(store: &S, user_id: &str) -> Result<Vec<NotificationView>, ReadError> {
	let user = store
		.user(user_id)
		.await?
		.ok_or_else(|| NotFoundError::User(user_id.to_string()))?;

	let mut notifications = store.notifications_for(&user.id).await?;

	// Stable, so rows sharing a date keep the store's order.
	notifications.sort_by_key(|notification| notification.date);

	Ok(notifications
		.into_iter()
		.map(|notification| NotificationView::new(&user.id, notification))
		.collect())
}
