use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::generation::gateway::RecipeGateway;
use crate::preferences::model::PreferenceModel;
use crate::recipes::store::RecipeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: RecipeStore,
    /// Model gateway. Default: `LlmClient`. Tests swap in a scripted double.
    pub gateway: Arc<dyn RecipeGateway>,
    /// The session preference model. One installation serves one user.
    pub preferences: Arc<Mutex<PreferenceModel>>,
    pub config: Config,
    /// Held for the duration of a generate call; a second call is rejected.
    pub generation_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: RecipeStore, gateway: Arc<dyn RecipeGateway>, config: Config) -> Self {
        Self {
            store,
            gateway,
            preferences: Arc::new(Mutex::new(PreferenceModel::default())),
            config,
            generation_guard: Arc::new(Mutex::new(())),
        }
    }
}
