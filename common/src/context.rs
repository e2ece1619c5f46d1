use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A cloneable cancellation signal shared by long running tasks.
///
/// Every clone keeps the context alive, [`Handler::cancel`] only resolves
/// once all of them have been dropped.
#[derive(Clone, Debug)]
pub struct Context {
	token: CancellationToken,
	_alive: mpsc::Sender<()>,
}

#[derive(Debug)]
pub struct Handler {
	token: CancellationToken,
	alive: mpsc::Receiver<()>,
}

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		let token = CancellationToken::new();
		let (alive, watcher) = mpsc::channel(1);

		(
			Self {
				token: token.clone(),
				_alive: alive,
			},
			Handler { token, alive: watcher },
		)
	}

	/// Resolves once the context has been cancelled.
	pub async fn done(&self) {
		self.token.cancelled().await
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

impl Handler {
	/// Waits until every clone of the context is gone.
	pub async fn done(&mut self) {
		// Nothing is ever sent, `recv` returns `None` once all senders dropped.
		while self.alive.recv().await.is_some() {}
	}

	pub async fn cancel(mut self) {
		self.token.cancel();
		self.done().await;
	}
}
