use crate::database::{Action, Activity, FollowerEdge, Notification};

/// Who an action notifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
	/// The user referenced by `user2`.
	FollowedUser,
	/// Everyone following the actor.
	Followers,
}

/// How an action fans out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
	pub audience: Audience,
	/// Whether notifications carry the activity's story.
	pub keeps_story: bool,
	/// Whether the actor becomes a follower of `user2`.
	pub creates_follower_edge: bool,
}

impl Rule {
	pub const fn for_action(action: Action) -> Self {
		match action {
			Action::Follow => Self {
				audience: Audience::FollowedUser,
				keeps_story: false,
				creates_follower_edge: true,
			},
			Action::Read | Action::Love | Action::Comment => Self {
				audience: Audience::Followers,
				keeps_story: true,
				creates_follower_edge: false,
			},
			// There is no story creation flow yet, so writes never carry a story.
			Action::Write => Self {
				audience: Audience::Followers,
				keeps_story: false,
				creates_follower_edge: false,
			},
		}
	}
}

/// The rows an activity produces besides itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOut {
	pub notifications: Vec<Notification>,
	pub follower_edges: Vec<FollowerEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutSummary {
	pub created_notifications: usize,
	pub follower_edges_touched: usize,
	/// The notified users, in notification order.
	pub recipients: Vec<String>,
}

impl FanOut {
	/// Whether planning `action` needs the actor's followers.
	pub fn needs_followers(action: Action) -> bool {
		Rule::for_action(action).audience == Audience::Followers
	}

	/// Derives the notifications and follower edges for `activity`.
	/// `followers` are the actor's followers and are only read for actions
	/// that notify them.
	pub fn plan(activity: &Activity, followers: &[String]) -> Self {
		let rule = Rule::for_action(activity.action);

		let recipients: Vec<&str> = match rule.audience {
			Audience::FollowedUser => activity.user2_id.as_deref().into_iter().collect(),
			Audience::Followers => followers.iter().map(String::as_str).collect(),
		};

		let story_id = rule.keeps_story.then(|| activity.story_id.clone()).flatten();

		let notifications = recipients
			.into_iter()
			.map(|notified_id| Notification {
				id: Notification::generate_id(),
				notified_id: notified_id.to_string(),
				actor_id: activity.actor_id.clone(),
				action: activity.action,
				date: activity.date,
				story_id: story_id.clone(),
			})
			.collect();

		let follower_edges = match (rule.creates_follower_edge, &activity.user2_id) {
			(true, Some(followed)) => vec![FollowerEdge {
				user_id: followed.clone(),
				follower_id: activity.actor_id.clone(),
			}],
			_ => Vec::new(),
		};

		Self {
			notifications,
			follower_edges,
		}
	}

	pub fn summary(&self) -> FanOutSummary {
		FanOutSummary {
			created_notifications: self.notifications.len(),
			follower_edges_touched: self.follower_edges.len(),
			recipients: self.notifications.iter().map(|n| n.notified_id.clone()).collect(),
		}
	}
}
