use crate::activity::ValidatedActivity;
use crate::database::Action;

/// A push notification text and who receives it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushMessage {
	pub recipients: Vec<String>,
	pub text: String,
}

impl PushMessage {
	/// Follows push to the followed user, story actions to the story's
	/// author and writes to every follower of the writer (`followers`).
	pub fn for_activity(activity: &ValidatedActivity, followers: &[String]) -> Self {
		let actor = activity.actor.full_name();

		match activity.action {
			Action::Follow => Self {
				recipients: activity.user2.iter().map(|user| user.id.clone()).collect(),
				text: format!("{actor} started following you."),
			},
			Action::Read | Action::Love | Action::Comment => {
				let verb = match activity.action {
					Action::Read => "just read",
					Action::Love => "loves",
					_ => "commented on",
				};

				match &activity.story {
					Some(story) => Self {
						recipients: vec![story.author_id.clone()],
						text: format!("{actor} {verb} {}", story.title),
					},
					None => Self::default(),
				}
			}
			Action::Write => Self {
				recipients: followers.to_vec(),
				text: format!("{actor} just wrote a cool story. Check it out!"),
			},
		}
	}
}
