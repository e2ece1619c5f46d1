mod activity;
mod error;
mod follower;
mod notification;
pub(crate) mod postgres;
pub mod schema;
mod store;
mod story;
mod user;

pub use activity::*;
pub use error::*;
pub use follower::*;
pub use notification::*;
pub use postgres::*;
pub use store::*;
pub use story::*;
pub use user::*;

/// Treats a missing, `null` or empty string reference as absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value: Option<String> = serde::Deserialize::deserialize(deserializer)?;
	Ok(value.filter(|v| !v.is_empty()))
}
