//! Service wiring: the state shared by every handler, and how it is built
//! from configuration.

use std::sync::Arc;

use anyhow::Context;

use coffeeshop_auth::{JwksVerifier, TokenVerifier, TrustedKeys};
use coffeeshop_infra::{DrinkStore, InMemoryDrinkStore, PostgresDrinkStore};

use crate::config::{AppConfig, JwksSource};

const MAX_DB_CONNECTIONS: u32 = 10;

/// State captured by the router.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DrinkStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DrinkStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }
}

/// Build state from configuration: load trusted keys, connect the store.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let keys = load_keys(&config.jwks).await?;
    tracing::info!(keys = keys.len(), "loaded trusted signing keys");
    let verifier = Arc::new(JwksVerifier::new(keys, config.auth.clone()));

    let store = build_store(config).await?;
    Ok(AppState::new(store, verifier))
}

pub async fn load_keys(source: &JwksSource) -> anyhow::Result<TrustedKeys> {
    match source {
        JwksSource::File(path) => TrustedKeys::from_file(path)
            .with_context(|| format!("loading JWKS from {}", path.display())),
        JwksSource::Url(url) => TrustedKeys::fetch(url)
            .await
            .with_context(|| format!("fetching JWKS from {url}")),
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DrinkStore>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory drink store");
        return Ok(Arc::new(InMemoryDrinkStore::new()));
    };

    let store = PostgresDrinkStore::connect(url, MAX_DB_CONNECTIONS)
        .await
        .context("connecting to Postgres")?;

    if config.reset_database {
        let seeded = store.reset().await.context("resetting drinks table")?;
        tracing::info!(drink_id = %seeded.id(), "drinks table reset and seeded");
    } else {
        store.setup().await.context("creating drinks table")?;
    }

    Ok(Arc::new(store))
}
