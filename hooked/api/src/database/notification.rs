use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use ulid::{Generator, Ulid};
use uuid::Uuid;

use super::Action;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Notification {
	/// A monotonic ULID, so ids sort by creation order within the same date.
	pub id: Uuid,
	/// The user being notified.
	pub notified_id: String,
	/// The user who caused the notification.
	pub actor_id: String,
	pub action: Action,
	pub date: DateTime<Utc>,
	pub story_id: Option<String>,
}

/// Shared so ids generated within the same millisecond still increase.
static ID_GENERATOR: Mutex<Generator> = Mutex::new(Generator::new());

impl Notification {
	/// Strictly increasing across the process, reads break date ties on it.
	pub fn generate_id() -> Uuid {
		let mut generator = ID_GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);

		// The random part only overflows after 2^80 ids in one millisecond.
		generator.generate().unwrap_or_else(|_| Ulid::new()).into()
	}
}
