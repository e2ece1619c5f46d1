use common::context::Context;

use crate::config::AppConfig;
use crate::database::Store;
use crate::push::PushDispatcher;

/// What request handlers need from the process wide state.
pub trait ApiGlobal: Send + Sync + 'static {
	type Store: Store;

	fn ctx(&self) -> &Context;

	fn config(&self) -> &AppConfig;

	fn store(&self) -> &Self::Store;

	fn push(&self) -> &PushDispatcher;
}

pub struct GlobalState<S> {
	pub ctx: Context,
	pub config: AppConfig,
	pub store: S,
	pub push: PushDispatcher,
}

impl<S: Store> GlobalState<S> {
	pub fn new(ctx: Context, config: AppConfig, store: S, push: PushDispatcher) -> Self {
		Self {
			ctx,
			config,
			store,
			push,
		}
	}
}

impl<S: Store> ApiGlobal for GlobalState<S> {
	type Store = S;

	#[inline(always)]
	fn ctx(&self) -> &Context {
		&self.ctx
	}

	#[inline(always)]
	fn config(&self) -> &AppConfig {
		&self.config
	}

	#[inline(always)]
	fn store(&self) -> &S {
		&self.store
	}

	#[inline(always)]
	fn push(&self) -> &PushDispatcher {
		&self.push
	}
}
