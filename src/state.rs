use std::sync::Arc;

use crate::auth::TokenSigner;
use crate::email::Notifier;
use crate::store::{TaskStore, UserStore};
use crate::tasks::TaskService;

/// Everything the handlers share, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub users: Arc<dyn UserStore>,
    pub notifier: Notifier,
    pub tokens: TokenSigner,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, notifier: Notifier, tokens: TokenSigner, bcrypt_cost: u32) -> Self
    where
        S: TaskStore + UserStore + 'static,
    {
        let task_store: Arc<dyn TaskStore> = store.clone();
        Self {
            tasks: TaskService::new(task_store),
            users: store,
            notifier,
            tokens,
            bcrypt_cost,
        }
    }
}
