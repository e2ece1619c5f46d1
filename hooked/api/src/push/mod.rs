//! Fire-and-forget push notifications.
//!
//! Requests only enqueue [`PushJob`]s on the [`PushDispatcher`]. The
//! [`PushWorker`] drains the queue and delivers every job on its own task, so
//! nothing on the request path waits for delivery. Failed deliveries are
//! logged and dropped, there is no retry.

use std::sync::Arc;

use common::context::Context;
use tokio::sync::mpsc;

mod message;
mod sink;

pub use message::*;
pub use sink::*;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
	#[error("push queue is closed")]
	QueueClosed,
	#[error("failed to deliver push notification: {0}")]
	Delivery(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushJob {
	pub recipient: String,
	pub message: String,
}

/// Cheap to clone handle used to schedule push notifications.
#[derive(Debug, Clone)]
pub struct PushDispatcher {
	sender: mpsc::UnboundedSender<PushJob>,
}

pub struct PushWorker<S> {
	receiver: mpsc::UnboundedReceiver<PushJob>,
	sink: Arc<S>,
}

/// Creates a dispatcher and the worker delivering its jobs through `sink`.
pub fn channel<S: PushSink>(sink: S) -> (PushDispatcher, PushWorker<S>) {
	let (sender, receiver) = mpsc::unbounded_channel();

	(
		PushDispatcher { sender },
		PushWorker {
			receiver,
			sink: Arc::new(sink),
		},
	)
}

impl PushDispatcher {
	pub fn notify_one(&self, recipient: impl Into<String>, message: impl Into<String>) -> Result<(), DispatchError> {
		self.sender
			.send(PushJob {
				recipient: recipient.into(),
				message: message.into(),
			})
			.map_err(|_| DispatchError::QueueClosed)
	}

	pub fn notify_many<I>(&self, recipients: I, message: &str) -> Result<(), DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		recipients
			.into_iter()
			.try_for_each(|recipient| self.notify_one(recipient, message))
	}

	pub fn dispatch(&self, message: PushMessage) -> Result<(), DispatchError> {
		match message.recipients.as_slice() {
			[] => Ok(()),
			[recipient] => self.notify_one(recipient.as_str(), message.text),
			_ => self.notify_many(message.recipients, &message.text),
		}
	}
}

impl<S: PushSink> PushWorker<S> {
	/// Runs until `ctx` is cancelled or every dispatcher is dropped. Jobs
	/// still queued at shutdown are delivered before returning.
	pub async fn run(mut self, ctx: Context) {
		loop {
			tokio::select! {
				_ = ctx.done() => break,
				job = self.receiver.recv() => match job {
					Some(job) => self.deliver(job),
					None => return,
				},
			}
		}

		self.receiver.close();
		while let Some(job) = self.receiver.recv().await {
			self.deliver(job);
		}
	}

	fn deliver(&self, job: PushJob) {
		let sink = self.sink.clone();

		tokio::spawn(async move {
			if let Err(err) = sink.deliver(&job).await {
				tracing::error!(event = "push-notification", recipient = %job.recipient, error = %err, "failed to deliver push notification");
			}
		});
	}
}
