use std::time::Duration;

use crate::context::Context;

#[tokio::test]
async fn test_context_cancel() {
	let (ctx, handler) = Context::new();

	let handle = tokio::spawn(async move {
		ctx.done().await;
		assert!(ctx.is_done());
	});

	tokio::time::timeout(Duration::from_millis(300), handler.cancel())
		.await
		.expect("task should be cancelled");
	tokio::time::timeout(Duration::from_millis(300), handle)
		.await
		.expect("task should be cancelled")
		.expect("panic in task");
}

#[tokio::test]
async fn test_cancel_waits_for_clones() {
	let (ctx, handler) = Context::new();
	let clone = ctx.clone();
	drop(ctx);

	let cancel = tokio::spawn(handler.cancel());

	tokio::time::sleep(Duration::from_millis(50)).await;
	assert!(clone.is_done());
	assert!(!cancel.is_finished(), "cancel resolved while a context was alive");

	drop(clone);

	tokio::time::timeout(Duration::from_millis(300), cancel)
		.await
		.expect("cancel should resolve once the context is dropped")
		.expect("panic in task");
}

#[tokio::test]
async fn test_handler_done_without_cancel() {
	let (ctx, mut handler) = Context::new();
	drop(ctx);

	tokio::time::timeout(Duration::from_millis(300), handler.done())
		.await
		.expect("handler should finish when no context is alive");
}
