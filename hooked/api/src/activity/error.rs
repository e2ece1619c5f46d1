use crate::database::{Action, PersistenceError};

/// An activity that breaks a business rule. Always the client's fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Must provide a supported action: follow, love, read, write, comment. Got {0:?}.")]
	UnsupportedAction(String),
	#[error("Must provide an actor.")]
	MissingActor,
	#[error("Actor with that ID not found: {0}")]
	ActorNotFound(String),
	#[error("Must provide a user to follow.")]
	MissingFollowTarget,
	#[error("User with that ID not found: {0}")]
	UserNotFound(String),
	#[error("Story with that ID not found: {0}")]
	StoryNotFound(String),
	#[error("You must provide a story ID for the {0} action.")]
	MissingStory(Action),
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
	#[error("invalid activity: {0}")]
	Validation(#[from] ValidationError),
	#[error("failed to persist activity: {0}")]
	Persistence(#[from] PersistenceError),
}
