// File: src/state.rs
// Purpose: Application state shared across handlers

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use vitrine::{
    Catalog, CatalogSource, Composer, Config, HttpCatalog, LazyScheduler, MemoryCatalog,
    RendererRegistry, ResolverOptions, SectionResolver, SectionStore, SqlSectionStore,
};
use vitrine_cache::ResponseCache;

#[derive(Clone)]
pub struct AppState {
    pub composer: Arc<Composer>,
    pub cache: ResponseCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn SectionStore>, catalog: Arc<dyn Catalog>, cache: ResponseCache, config: Config) -> Self {
        let resolver = SectionResolver::new(catalog, ResolverOptions::from(&config.homepage));
        let composer = Composer::new(store, resolver, RendererRegistry::new(), config.homepage.clone());

        Self {
            composer: Arc::new(composer),
            cache,
            config: Arc::new(config),
        }
    }

    /// Connect the store and build the catalog named by the config
    pub async fn from_config(config: Config) -> Result<Self> {
        let cache = ResponseCache::new(config.cache.to_runtime_config()?);

        let store = SqlSectionStore::connect(&config.database.url)
            .await
            .with_context(|| format!("Failed to open section store at {}", config.database.url))?;

        let catalog: Arc<dyn Catalog> = match config.catalog.source {
            CatalogSource::Http => {
                info!(base_url = %config.catalog.base_url, "using HTTP catalog");
                Arc::new(HttpCatalog::new(config.catalog.base_url.clone(), cache.clone())?)
            }
            CatalogSource::Memory => match &config.catalog.fixture {
                Some(path) => {
                    info!(fixture = %path, "using fixture catalog");
                    Arc::new(MemoryCatalog::load(path)?)
                }
                None => {
                    info!("using empty in-memory catalog");
                    Arc::new(MemoryCatalog::default())
                }
            },
        };

        Ok(Self::new(Arc::new(store), catalog, cache, config))
    }

    pub fn store(&self) -> &Arc<dyn SectionStore> {
        self.composer.store()
    }

    /// Server-side loader for inline lazy mode
    pub fn scheduler(&self) -> LazyScheduler {
        LazyScheduler::batched(self.config.homepage.lazy_batch_size)
    }
}
