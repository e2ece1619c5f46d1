use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
	Follow,
	Love,
	Read,
	Write,
	Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0:?}")]
pub struct UnknownAction(pub String);

impl Action {
	pub const ALL: [Action; 5] = [Action::Follow, Action::Love, Action::Read, Action::Write, Action::Comment];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Follow => "follow",
			Self::Love => "love",
			Self::Read => "read",
			Self::Write => "write",
			Self::Comment => "comment",
		}
	}

	/// Whether an activity of this kind must reference an existing story.
	/// Writes are exempt until stories can be created through the API.
	pub fn requires_story(self) -> bool {
		matches!(self, Self::Love | Self::Read | Self::Comment)
	}
}

impl Display for Action {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Action {
	type Err = UnknownAction;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|action| action.as_str() == s)
			.ok_or_else(|| UnknownAction(s.to_string()))
	}
}

// Stored as plain text rather than a postgres enum.
impl Type<Postgres> for Action {
	fn type_info() -> PgTypeInfo {
		<&str as Type<Postgres>>::type_info()
	}

	fn compatible(ty: &PgTypeInfo) -> bool {
		<&str as Type<Postgres>>::compatible(ty)
	}
}

impl Encode<'_, Postgres> for Action {
	fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
		<&str as Encode<Postgres>>::encode(self.as_str(), buf)
	}
}

impl<'r> Decode<'r, Postgres> for Action {
	fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
		Ok(<&str as Decode<Postgres>>::decode(value)?.parse()?)
	}
}

/// A recorded user action. Activities are append-only.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Activity {
	#[sqlx(rename = "sid")]
	pub id: String,
	pub action: Action,
	pub date: DateTime<Utc>,
	pub actor_id: String,
	pub user2_id: Option<String>,
	pub story_id: Option<String>,
}

impl Activity {
	/// A fresh 24 character id, the same shape as the fixture ids.
	pub fn generate_id() -> String {
		let mut id = Uuid::new_v4().simple().to_string();
		id.truncate(24);
		id
	}

	/// Timestamps are kept at millisecond precision.
	pub fn timestamp(date: DateTime<Utc>) -> DateTime<Utc> {
		date.trunc_subsecs(3)
	}
}
