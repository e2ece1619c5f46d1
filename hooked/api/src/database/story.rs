#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Deserialize)]
pub struct Story {
	#[sqlx(rename = "sid")]
	#[serde(rename = "_id")]
	pub id: String,
	pub title: String,
	/// The user who wrote the story.
	#[serde(rename = "author")]
	pub author_id: String,
}
