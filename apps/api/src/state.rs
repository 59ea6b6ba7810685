//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use vault_db::{RequestContext, Storage};
use vault_usecase::ItemUsecase;

/// State handed to every handler.
///
/// Each request gets a child of the root context with its own deadline, so
/// cancelling the root (on shutdown) reaches every in-flight storage call.
pub struct AppState<S> {
    items: Arc<ItemUsecase<S>>,
    root: RequestContext,
    request_timeout: Duration,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            items: Arc::clone(&self.items),
            root: self.root.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

impl<S: Storage> AppState<S> {
    /// Creates the state.
    pub fn new(items: ItemUsecase<S>, root: RequestContext, request_timeout: Duration) -> Self {
        AppState {
            items: Arc::new(items),
            root,
            request_timeout,
        }
    }

    /// The item usecase.
    pub fn items(&self) -> &ItemUsecase<S> {
        &self.items
    }

    /// A fresh context for one request.
    pub fn request_context(&self) -> RequestContext {
        self.root.clone().with_timeout(self.request_timeout)
    }
}
