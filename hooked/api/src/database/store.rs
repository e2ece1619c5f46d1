use async_trait::async_trait;

use super::{Activity, Notification, PersistenceError, Story, User};
use crate::activity::FanOutSummary;

/// The storage seam shared by the HTTP handlers, validation and fan-out.
#[async_trait]
pub trait Store: Send + Sync + 'static {
	async fn user(&self, id: &str) -> Result<Option<User>, PersistenceError>;

	async fn story(&self, id: &str) -> Result<Option<Story>, PersistenceError>;

	/// Writes the activity and everything it fans out to as one atomic unit.
	/// Nothing is persisted when this returns an error.
	async fn save_activity(&self, activity: &Activity) -> Result<FanOutSummary, PersistenceError>;

	/// Notifications for `user_id`, oldest first.
	async fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>, PersistenceError>;
}
