//! Shared application state for all routes. Built once at startup, never mutated.

use crate::auth::TokenService;
use crate::model::{Resource, SaveContext};
use crate::notify::Notifier;
use crate::service::ResourceController;
use crate::settings::Settings;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, settings: Settings) -> Self {
        let tokens = TokenService::new(settings.jwt_secret.as_bytes(), settings.token_ttl());
        AppState {
            store,
            tokens: Arc::new(tokens),
            notifier,
            settings: Arc::new(settings),
        }
    }

    pub fn save_context(&self) -> SaveContext {
        SaveContext {
            password_cost: self.settings.bcrypt_cost,
        }
    }

    /// Controller for `R` over the shared store.
    pub fn controller<R: Resource>(&self) -> ResourceController<R> {
        ResourceController::new(self.store.clone(), self.save_context())
    }
}
