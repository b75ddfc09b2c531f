use std::sync::Arc;

use crate::auth::repo::{SessionStore, UserStore};
use crate::catalog::repo::CatalogStore;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::games::repo::GameStore;
use crate::memory::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub games: Arc<dyn GameStore>,
    pub catalog: Arc<dyn CatalogStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.database_url.as_deref() {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url).await?);
                Ok(Self::from_parts(
                    config,
                    store.clone(),
                    store.clone(),
                    store.clone(),
                    store,
                ))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Ok(Self::in_memory_with(config, Arc::new(MemoryStore::new())))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        games: Arc<dyn GameStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            config,
            users,
            sessions,
            games,
            catalog,
        }
    }

    pub fn in_memory_with(config: Arc<AppConfig>, store: Arc<MemoryStore>) -> Self {
        Self::from_parts(config, store.clone(), store.clone(), store.clone(), store)
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::in_memory_with(Arc::new(AppConfig::local()), Arc::new(MemoryStore::new()))
    }
}
