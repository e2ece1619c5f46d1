//! Destructive fixture reload used to seed a development database.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::activity::ValidationError;
use crate::database::{empty_as_none, postgres, Action, Activity, Story, User};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("failed to read {path}: {source}")]
	Read { path: PathBuf, source: std::io::Error },
	#[error("failed to parse {name}: {source}")]
	Parse {
		name: &'static str,
		source: serde_json::Error,
	},
	#[error("invalid activity {id}: {source}")]
	Invalid { id: String, source: ValidationError },
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
struct ActivityRecord {
	#[serde(rename = "_id")]
	id: String,
	action: Action,
	date: DateTime<Utc>,
	actor: String,
	#[serde(default, deserialize_with = "empty_as_none")]
	user2: Option<String>,
	#[serde(default, deserialize_with = "empty_as_none")]
	story: Option<String>,
}

impl TryFrom<ActivityRecord> for Activity {
	type Error = FixtureError;

	/// Rejects records the fan-out rules could not replay.
	fn try_from(record: ActivityRecord) -> Result<Self, Self::Error> {
		let missing = match record.action {
			Action::Follow if record.user2.is_none() => Some(ValidationError::MissingFollowTarget),
			action if action.requires_story() && record.story.is_none() => Some(ValidationError::MissingStory(action)),
			_ => None,
		};

		if let Some(source) = missing {
			return Err(FixtureError::Invalid { id: record.id, source });
		}

		Ok(Self {
			id: record.id,
			action: record.action,
			date: Activity::timestamp(record.date),
			actor_id: record.actor,
			user2_id: record.user2,
			story_id: record.story,
		})
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixtures {
	pub users: Vec<User>,
	pub stories: Vec<Story>,
	/// Sorted by date, oldest first.
	pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
	pub users: usize,
	pub stories: usize,
	pub activities: usize,
	pub notifications: usize,
	pub follower_edges: usize,
}

fn parse<T: serde::de::DeserializeOwned>(name: &'static str, data: &[u8]) -> Result<Vec<T>, FixtureError> {
	serde_json::from_slice(data).map_err(|source| FixtureError::Parse { name, source })
}

impl Fixtures {
	pub fn from_slices(users: &[u8], stories: &[u8], activities: &[u8]) -> Result<Self, FixtureError> {
		let mut activities = parse::<ActivityRecord>("activities.json", activities)?
			.into_iter()
			.map(Activity::try_from)
			.collect::<Result<Vec<_>, _>>()?;

		// Replaying in date order keeps follower edges consistent with
		// the notifications derived from them.
		activities.sort_by_key(|activity| activity.date);

		Ok(Self {
			users: parse("users.json", users)?,
			stories: parse("stories.json", stories)?,
			activities,
		})
	}

	/// Reads `users.json`, `stories.json` and `activities.json` from `dir`.
	pub async fn read(dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
		let dir = dir.as_ref();

		let read = |name: &str| {
			let path = dir.join(name);
			async move { tokio::fs::read(&path).await.map_err(|source| FixtureError::Read { path, source }) }
		};

		let users = read("users.json").await?;
		let stories = read("stories.json").await?;
		let activities = read("activities.json").await?;

		Self::from_slices(&users, &stories, &activities)
	}
}

/// Wipes every table and reloads it from `fixtures`, recomputing
/// notifications and follower edges from the activities. Runs in a single
/// transaction, no push notifications are sent.
pub async fn load(db: &PgPool, fixtures: &Fixtures) -> Result<LoadSummary, FixtureError> {
	let mut tx = db.begin().await?;

	for table in ["notifications", "followers", "activities", "stories", "users"] {
		sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
	}

	for user in &fixtures.users {
		sqlx::query("INSERT INTO users (sid, firstname, lastname) VALUES ($1, $2, $3)")
			.bind(&user.id)
			.bind(&user.first_name)
			.bind(&user.last_name)
			.execute(&mut *tx)
			.await?;
	}

	for story in &fixtures.stories {
		sqlx::query("INSERT INTO stories (sid, title, author_id) VALUES ($1, $2, $3)")
			.bind(&story.id)
			.bind(&story.title)
			.bind(&story.author_id)
			.execute(&mut *tx)
			.await?;
	}

	let mut summary = LoadSummary {
		users: fixtures.users.len(),
		stories: fixtures.stories.len(),
		..Default::default()
	};

	for activity in &fixtures.activities {
		let fan_out = postgres::save_activity_in(&mut tx, activity).await?;
		summary.activities += 1;
		summary.notifications += fan_out.created_notifications;
	}

	summary.follower_edges = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM followers")
		.fetch_one(&mut *tx)
		.await? as usize;

	tx.commit().await?;

	Ok(summary)
}
