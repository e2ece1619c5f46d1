#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Deserialize)]
pub struct User {
	#[sqlx(rename = "sid")]
	#[serde(rename = "_id")]
	pub id: String,
	#[sqlx(rename = "firstname")]
	#[serde(rename = "firstname")]
	pub first_name: String,
	#[sqlx(rename = "lastname")]
	#[serde(rename = "lastname")]
	pub last_name: String,
}

impl User {
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}
}
