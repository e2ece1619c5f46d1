use sqlx::PgPool;

const STATEMENTS: [&str; 6] = [
	r#"
	CREATE TABLE IF NOT EXISTS users (
		sid TEXT PRIMARY KEY,
		firstname TEXT NOT NULL,
		lastname TEXT NOT NULL
	)"#,
	r#"
	CREATE TABLE IF NOT EXISTS stories (
		sid TEXT PRIMARY KEY,
		title TEXT NOT NULL,
		author_id TEXT NOT NULL REFERENCES users (sid)
	)"#,
	r#"
	CREATE TABLE IF NOT EXISTS activities (
		sid TEXT PRIMARY KEY,
		action TEXT NOT NULL,
		date TIMESTAMPTZ NOT NULL,
		actor_id TEXT NOT NULL REFERENCES users (sid),
		story_id TEXT REFERENCES stories (sid),
		user2_id TEXT REFERENCES users (sid)
	)"#,
	r#"
	CREATE TABLE IF NOT EXISTS followers (
		user_id TEXT NOT NULL REFERENCES users (sid),
		follower_id TEXT NOT NULL REFERENCES users (sid),
		PRIMARY KEY (user_id, follower_id)
	)"#,
	r#"
	CREATE TABLE IF NOT EXISTS notifications (
		id UUID PRIMARY KEY,
		notified_id TEXT NOT NULL REFERENCES users (sid),
		actor_id TEXT NOT NULL REFERENCES users (sid),
		action TEXT NOT NULL,
		date TIMESTAMPTZ NOT NULL,
		story_id TEXT REFERENCES stories (sid)
	)"#,
	"CREATE INDEX IF NOT EXISTS notifications_notified_id_date_idx ON notifications (notified_id, date, id)",
];

/// Creates any missing table. Safe to run on every start.
pub async fn create(db: &PgPool) -> Result<(), sqlx::Error> {
	for statement in STATEMENTS {
		sqlx::query(statement).execute(db).await?;
	}

	tracing::debug!("database schema ready");

	Ok(())
}
