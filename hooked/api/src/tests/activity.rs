use chrono::{TimeZone, Utc};
use common::context::Context;
use tokio::sync::mpsc;

use super::global::{assert_no_job, init_logging, next_job, RecordingSink};
use super::store::MemoryStore;
use crate::activity::{self, validate, ActivityError, ActivityRequest, ValidationError};
use crate::database::{Action, FollowerEdge};
use crate::push::{self, PushDispatcher, PushJob};

fn request(action: &str, actor: Option<&str>, user2: Option<&str>, story: Option<&str>) -> ActivityRequest {
	ActivityRequest {
		action: action.to_string(),
		date: None,
		actor: actor.map(str::to_string),
		user2: user2.map(str::to_string),
		story: story.map(str::to_string),
	}
}

fn dispatcher() -> (PushDispatcher, mpsc::UnboundedReceiver<PushJob>) {
	init_logging();

	let (sink, jobs) = RecordingSink::new();
	let (dispatcher, worker) = push::channel(sink);

	// Never cancelled, the worker stops once the dispatcher is dropped.
	let (ctx, _) = Context::new();
	tokio::spawn(worker.run(ctx));

	(dispatcher, jobs)
}

async fn rejected(store: &MemoryStore, request: ActivityRequest) -> ValidationError {
	match validate(store, &request).await {
		Err(ActivityError::Validation(err)) => err,
		other => panic!("expected a validation error, got {other:?}"),
	}
}

#[tokio::test]
async fn test_validation_order() {
	let store = MemoryStore::seeded();

	// The action is checked before anything else.
	assert_eq!(
		rejected(&store, request("dance", None, None, None)).await,
		ValidationError::UnsupportedAction("dance".to_string())
	);
	assert_eq!(
		rejected(&store, request("", Some("u1"), None, None)).await,
		ValidationError::UnsupportedAction(String::new())
	);
	assert_eq!(
		rejected(&store, request("Follow", Some("u1"), Some("u2"), None)).await,
		ValidationError::UnsupportedAction("Follow".to_string())
	);

	assert_eq!(
		rejected(&store, request("read", None, Some("nobody"), Some("nostory"))).await,
		ValidationError::MissingActor
	);
	assert_eq!(
		rejected(&store, request("read", Some("ghost"), Some("nobody"), Some("nostory"))).await,
		ValidationError::ActorNotFound("ghost".to_string())
	);
	assert_eq!(
		rejected(&store, request("follow", Some("u1"), None, None)).await,
		ValidationError::MissingFollowTarget
	);
	assert_eq!(
		rejected(&store, request("follow", Some("u1"), Some("ghost"), None)).await,
		ValidationError::UserNotFound("ghost".to_string())
	);
	// `user2` is resolved whenever it is given, not only for follows.
	assert_eq!(
		rejected(&store, request("read", Some("u1"), Some("ghost"), Some("nostory"))).await,
		ValidationError::UserNotFound("ghost".to_string())
	);
	assert_eq!(
		rejected(&store, request("read", Some("u1"), None, Some("nostory"))).await,
		ValidationError::StoryNotFound("nostory".to_string())
	);

	assert!(store.activities().is_empty());
	assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn test_story_required() {
	let store = MemoryStore::seeded();

	for action in [Action::Love, Action::Read, Action::Comment] {
		assert_eq!(
			rejected(&store, request(action.as_str(), Some("u2"), None, None)).await,
			ValidationError::MissingStory(action)
		);
	}

	// Writes are accepted without a story.
	let validated = validate(&store, &request("write", Some("u2"), None, None))
		.await
		.expect("write without story should validate");
	assert_eq!(validated.action, Action::Write);
	assert_eq!(validated.story, None);
}

#[tokio::test]
async fn test_validation_messages() {
	assert_eq!(ValidationError::MissingActor.to_string(), "Must provide an actor.");
	assert_eq!(
		ValidationError::MissingStory(Action::Love).to_string(),
		"You must provide a story ID for the love action."
	);
	assert_eq!(
		ValidationError::ActorNotFound("x".to_string()).to_string(),
		"Actor with that ID not found: x"
	);
}

#[tokio::test]
async fn test_follow() {
	let store = MemoryStore::seeded();
	let (push, mut jobs) = dispatcher();

	let summary = activity::create(&store, &push, request("follow", Some("u2"), Some("u1"), None))
		.await
		.expect("follow should succeed");

	assert_eq!(summary.created_notifications, 1);
	assert_eq!(summary.follower_edges_touched, 1);
	assert_eq!(summary.recipients, vec!["u1".to_string()]);

	let activities = store.activities();
	assert_eq!(activities.len(), 1);
	assert_eq!(activities[0].action, Action::Follow);
	assert_eq!(activities[0].actor_id, "u2");
	assert_eq!(activities[0].user2_id.as_deref(), Some("u1"));
	assert_eq!(activities[0].id.len(), 24);

	let notifications = store.notifications();
	assert_eq!(notifications.len(), 1);
	assert_eq!(notifications[0].notified_id, "u1");
	assert_eq!(notifications[0].actor_id, "u2");
	assert_eq!(notifications[0].date, activities[0].date);

	assert_eq!(
		store.followers(),
		vec![FollowerEdge {
			user_id: "u1".to_string(),
			follower_id: "u2".to_string(),
		}]
	);

	let job = next_job(&mut jobs).await;
	assert_eq!(job.recipient, "u1");
	assert_eq!(job.message, "Grace Hopper started following you.");
	assert_no_job(&mut jobs).await;
}

#[tokio::test]
async fn test_follow_twice_keeps_one_edge() {
	let store = MemoryStore::seeded();
	let (push, _jobs) = dispatcher();

	for _ in 0..2 {
		activity::create(&store, &push, request("follow", Some("u2"), Some("u1"), None))
			.await
			.expect("follow should succeed");
	}

	assert_eq!(store.activities().len(), 2);
	assert_eq!(store.notifications().len(), 2);
	assert_eq!(store.followers().len(), 1);
}

#[tokio::test]
async fn test_story_action_notifies_followers() {
	let store = MemoryStore::seeded();
	let (push, mut jobs) = dispatcher();

	store.add_follower("u2", "u1");
	store.add_follower("u2", "u3");

	let summary = activity::create(&store, &push, request("love", Some("u2"), None, Some("s1")))
		.await
		.expect("love should succeed");

	assert_eq!(summary.created_notifications, 2);
	assert_eq!(summary.follower_edges_touched, 0);

	let mut notified: Vec<_> = store.notifications().into_iter().map(|n| n.notified_id).collect();
	notified.sort();
	assert_eq!(notified, vec!["u1".to_string(), "u3".to_string()]);
	assert!(store
		.notifications()
		.iter()
		.all(|n| n.story_id.as_deref() == Some("s1") && n.action == Action::Love));

	// The push goes to the story's author, not to the followers.
	let job = next_job(&mut jobs).await;
	assert_eq!(job.recipient, "u1");
	assert_eq!(job.message, "Grace Hopper loves The Analytical Engine");
	assert_no_job(&mut jobs).await;
}

#[tokio::test]
async fn test_no_followers_still_saves() {
	let store = MemoryStore::seeded();
	let (push, _jobs) = dispatcher();

	let summary = activity::create(&store, &push, request("read", Some("u3"), None, Some("s1")))
		.await
		.expect("read should succeed");

	assert_eq!(summary.created_notifications, 0);
	assert_eq!(store.activities().len(), 1);
	assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn test_write_pushes_followers() {
	let store = MemoryStore::seeded();
	let (push, mut jobs) = dispatcher();

	store.add_follower("u1", "u2");
	store.add_follower("u1", "u3");

	let summary = activity::create(&store, &push, request("write", Some("u1"), None, Some("s1")))
		.await
		.expect("write should succeed");

	assert_eq!(summary.created_notifications, 2);
	assert!(store.notifications().iter().all(|n| n.story_id.is_none()));
	// Only the notifications lose the story.
	assert_eq!(store.activities()[0].story_id.as_deref(), Some("s1"));

	let mut recipients = vec![next_job(&mut jobs).await, next_job(&mut jobs).await];
	recipients.sort_by(|a, b| a.recipient.cmp(&b.recipient));
	assert_eq!(recipients[0].recipient, "u2");
	assert_eq!(recipients[1].recipient, "u3");
	assert!(recipients
		.iter()
		.all(|job| job.message == "Ada Lovelace just wrote a cool story. Check it out!"));
}

#[tokio::test]
async fn test_save_failure() {
	let store = MemoryStore::seeded();
	let (push, mut jobs) = dispatcher();

	store.set_fail_writes(true);

	let err = activity::create(&store, &push, request("follow", Some("u2"), Some("u1"), None))
		.await
		.expect_err("save should fail");
	assert!(matches!(err, ActivityError::Persistence(_)));

	assert!(store.activities().is_empty());
	assert!(store.followers().is_empty());
	assert_no_job(&mut jobs).await;
}

#[tokio::test]
async fn test_push_failure_does_not_fail_request() {
	let store = MemoryStore::seeded();

	// Nobody drains this queue.
	let (push, worker) = push::channel(RecordingSink::new().0);
	drop(worker);

	activity::create(&store, &push, request("follow", Some("u2"), Some("u1"), None))
		.await
		.expect("push failures must not fail the activity");

	assert_eq!(store.activities().len(), 1);
}

#[tokio::test]
async fn test_activity_date() {
	let store = MemoryStore::seeded();
	let (push, _jobs) = dispatcher();

	let date = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
	let mut req = request("follow", Some("u2"), Some("u1"), None);
	req.date = Some(date);
	activity::create(&store, &push, req).await.expect("follow should succeed");

	let before = Utc::now();
	activity::create(&store, &push, request("follow", Some("u3"), Some("u1"), None))
		.await
		.expect("follow should succeed");

	let activities = store.activities();
	assert_eq!(activities[0].date, Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap());
	// Defaults to the server clock, at millisecond precision.
	assert!(activities[1].date >= before - chrono::Duration::milliseconds(1));
	assert_eq!(activities[1].date.timestamp_subsec_nanos() % 1_000_000, 0);
}

#[test]
fn test_request_empty_references() {
	let request: ActivityRequest = serde_json::from_str(
		r#"{"action": "write", "date": "2023-05-01T10:00:00.250Z", "actor": "u1", "user2": "", "story": null}"#,
	)
	.expect("failed to parse request");

	assert_eq!(request.action, "write");
	assert_eq!(request.actor.as_deref(), Some("u1"));
	assert_eq!(request.user2, None);
	assert_eq!(request.story, None);
	assert_eq!(request.date, Some(Utc.timestamp_opt(1_682_935_200, 250_000_000).unwrap()));
}
