use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::{Activity, FollowerEdge, Notification, PersistenceError, Store, Story, User};
use crate::activity::{FanOut, FanOutSummary};

/// [`Store`] backed by postgres.
#[derive(Debug, Clone)]
pub struct PgStore {
	db: PgPool,
}

impl PgStore {
	pub fn new(db: PgPool) -> Self {
		Self { db }
	}
}

async fn follower_ids(conn: &mut PgConnection, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
	sqlx::query_scalar("SELECT follower_id FROM followers WHERE user_id = $1 ORDER BY follower_id")
		.bind(user_id)
		.fetch_all(&mut *conn)
		.await
}

async fn insert_activity(conn: &mut PgConnection, activity: &Activity) -> Result<(), sqlx::Error> {
	sqlx::query(
		r#"
		INSERT INTO activities (sid, action, date, actor_id, user2_id, story_id)
		VALUES ($1, $2, $3, $4, $5, $6)
		"#,
	)
	.bind(&activity.id)
	.bind(activity.action)
	.bind(activity.date)
	.bind(&activity.actor_id)
	.bind(&activity.user2_id)
	.bind(&activity.story_id)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

async fn insert_notification(conn: &mut PgConnection, notification: &Notification) -> Result<(), sqlx::Error> {
	sqlx::query(
		r#"
		INSERT INTO notifications (id, notified_id, actor_id, action, date, story_id)
		VALUES ($1, $2, $3, $4, $5, $6)
		"#,
	)
	.bind(notification.id)
	.bind(&notification.notified_id)
	.bind(&notification.actor_id)
	.bind(notification.action)
	.bind(notification.date)
	.bind(&notification.story_id)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

/// Returns whether a new edge was written.
async fn insert_follower(conn: &mut PgConnection, edge: &FollowerEdge) -> Result<bool, sqlx::Error> {
	let result = sqlx::query(
		r#"
		INSERT INTO followers (user_id, follower_id)
		VALUES ($1, $2)
		ON CONFLICT DO NOTHING
		"#,
	)
	.bind(&edge.user_id)
	.bind(&edge.follower_id)
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected() == 1)
}

/// Inserts `activity` and its fan-out on `conn`. The caller owns the
/// transaction.
pub(crate) async fn save_activity_in(conn: &mut PgConnection, activity: &Activity) -> Result<FanOutSummary, sqlx::Error> {
	let followers = if FanOut::needs_followers(activity.action) {
		follower_ids(conn, &activity.actor_id).await?
	} else {
		Vec::new()
	};

	let fan_out = FanOut::plan(activity, &followers);

	insert_activity(conn, activity).await?;

	for notification in &fan_out.notifications {
		insert_notification(conn, notification).await?;
	}

	for edge in &fan_out.follower_edges {
		if !insert_follower(conn, edge).await? {
			tracing::debug!(user_id = %edge.user_id, follower_id = %edge.follower_id, "follower edge already present");
		}
	}

	Ok(fan_out.summary())
}

#[async_trait]
impl Store for PgStore {
	async fn user(&self, id: &str) -> Result<Option<User>, PersistenceError> {
		Ok(sqlx::query_as("SELECT sid, firstname, lastname FROM users WHERE sid = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn story(&self, id: &str) -> Result<Option<Story>, PersistenceError> {
		Ok(sqlx::query_as("SELECT sid, title, author_id FROM stories WHERE sid = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?)
	}

	async fn save_activity(&self, activity: &Activity) -> Result<FanOutSummary, PersistenceError> {
		let mut tx = self.db.begin().await?;

		// Dropping the transaction on error rolls everything back.
		let summary = save_activity_in(&mut tx, activity).await?;

		tx.commit().await?;

		Ok(summary)
	}

	async fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>, PersistenceError> {
		Ok(sqlx::query_as(
			r#"
			SELECT id, notified_id, actor_id, action, date, story_id
			FROM notifications
			WHERE notified_id = $1
			ORDER BY date ASC, id ASC
			"#,
		)
		.bind(user_id)
		.fetch_all(&self.db)
		.await?)
	}
}
