use super::{ActivityError, ActivityRequest, ValidationError};
use crate::database::{Action, Activity, Store, Story, User};

/// An activity that passed validation, with every reference resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedActivity {
	pub action: Action,
	pub actor: User,
	pub user2: Option<User>,
	pub story: Option<Story>,
}

impl ValidatedActivity {
	/// The activity row keeps every reference, the fan-out decides what its
	/// notifications carry.
	pub fn to_activity(&self, date: chrono::DateTime<chrono::Utc>) -> Activity {
		Activity {
			id: Activity::generate_id(),
			action: self.action,
			date: Activity::timestamp(date),
			actor_id: self.actor.id.clone(),
			user2_id: self.user2.as_ref().map(|user| user.id.clone()),
			story_id: self.story.as_ref().map(|story| story.id.clone()),
		}
	}
}

/// Checks `request` against the business rules, stopping at the first
/// violation. Only reads from the store.
pub async fn validate<S: Store + ?Sized>(store: &S, request: &ActivityRequest) -> Result<ValidatedActivity, ActivityError> {
	let action: Action = request
		.action
		.parse()
		.map_err(|_| ValidationError::UnsupportedAction(request.action.clone()))?;

	let actor_id = request.actor.as_deref().ok_or(ValidationError::MissingActor)?;
	let actor = store
		.user(actor_id)
		.await?
		.ok_or_else(|| ValidationError::ActorNotFound(actor_id.to_string()))?;

	if action == Action::Follow && request.user2.is_none() {
		return Err(ValidationError::MissingFollowTarget.into());
	}

	let user2 = match request.user2.as_deref() {
		Some(id) => Some(
			store
				.user(id)
				.await?
				.ok_or_else(|| ValidationError::UserNotFound(id.to_string()))?,
		),
		None => None,
	};

	let story = match request.story.as_deref() {
		Some(id) => Some(
			store
				.story(id)
				.await?
				.ok_or_else(|| ValidationError::StoryNotFound(id.to_string()))?,
		),
		None if action.requires_story() => return Err(ValidationError::MissingStory(action).into()),
		None => None,
	};

	Ok(ValidatedActivity {
		action,
		actor,
		user2,
		story,
	})
}
