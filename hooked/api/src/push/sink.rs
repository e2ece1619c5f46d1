use std::io::Write;

use async_trait::async_trait;

use super::{DispatchError, PushJob};

/// Where push notifications end up.
#[async_trait]
pub trait PushSink: Send + Sync + 'static {
	async fn deliver(&self, job: &PushJob) -> Result<(), DispatchError>;
}

/// Stand-in for a real push provider, prints every notification to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
	pub fn render(job: &PushJob) -> String {
		let delimiter = "-".repeat(30);
		format!(
			"{delimiter}\n[Push Notification for user {}]\n     {}\n{delimiter}\n",
			job.recipient, job.message
		)
	}
}

#[async_trait]
impl PushSink for ConsoleSink {
	async fn deliver(&self, job: &PushJob) -> Result<(), DispatchError> {
		tracing::debug!(recipient = %job.recipient, "sending push notification");

		let mut stdout = std::io::stdout().lock();
		writeln!(stdout, "{}", Self::render(job))?;
		stdout.flush()?;

		Ok(())
	}
}
