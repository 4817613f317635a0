//! Application state wiring all collaborators together.
//!
//! AppState holds the concrete clients used by both the CLI commands and
//! the web front-end. Clients are constructed once here and injected;
//! there are no process-wide globals. Session state lives in a DashMap --
//! each entry is private to one session, so no cross-session locking
//! discipline is needed.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use haven_core::chat::{ChatEngine, SessionState};
use haven_core::persona::PersonaCatalog;
use haven_infra::config::{resolve_data_dir, Settings};
use haven_infra::llm::bedrock::BedrockProvider;
use haven_infra::secret::build_secret_chain;
use haven_infra::store::DynamoStore;

/// Concrete engine type pinned to the infra implementations.
pub type ConcreteChatEngine = ChatEngine<BedrockProvider, DynamoStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteChatEngine>,
    pub catalog: Arc<PersonaCatalog>,
    /// Live sessions; each turn locks its own entry only.
    pub sessions: Arc<DashMap<Uuid, Arc<Mutex<SessionState>>>>,
    /// Store handle for the provisioning and inspection commands
    /// (the engine owns its own instance).
    pub store: Arc<DynamoStore>,
}

impl AppState {
    /// Resolve settings through the secrets chain and wire the clients.
    pub fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let chain = build_secret_chain(&data_dir);
        let settings = Settings::from_chain(&chain)?;

        let provider =
            BedrockProvider::new(settings.credentials.clone(), settings.region.clone());
        let engine_store = DynamoStore::new(
            settings.credentials.clone(),
            settings.region.clone(),
            settings.table_name.clone(),
        );
        let store = DynamoStore::new(
            settings.credentials.clone(),
            settings.region.clone(),
            settings.table_name.clone(),
        );

        Ok(Self {
            engine: Arc::new(ChatEngine::new(provider, engine_store)),
            catalog: Arc::new(PersonaCatalog::builtin()),
            sessions: Arc::new(DashMap::new()),
            store: Arc::new(store),
        })
    }
}
