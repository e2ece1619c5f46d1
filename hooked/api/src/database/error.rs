#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// A direct lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
	#[error("User with that ID not found: {0}")]
	User(String),
}
