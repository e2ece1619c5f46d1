/// `follower_id` follows `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::FromRow)]
pub struct FollowerEdge {
	pub user_id: String,
	pub follower_id: String,
}
