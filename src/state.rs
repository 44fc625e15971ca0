use std::sync::Arc;

use crate::{
    models::Movie,
    services::{
        catalog::{CatalogLookup, InMemoryCatalog},
        preferences::{InMemoryPreferenceStore, PreferenceStore, PreferenceUpdater},
        Recommender,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogLookup>,
    pub preferences: Arc<PreferenceUpdater>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    /// Wires the services over one catalog and one preference store
    pub fn new(catalog: Arc<dyn CatalogLookup>, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            preferences: Arc::new(PreferenceUpdater::new(catalog.clone(), store.clone())),
            recommender: Arc::new(Recommender::new(catalog.clone(), store)),
            catalog,
        }
    }

    /// Fully in-memory state over a fixed catalog
    pub fn in_memory(movies: Vec<Movie>) -> Self {
        Self::new(
            Arc::new(InMemoryCatalog::new(movies)),
            Arc::new(InMemoryPreferenceStore::new()),
        )
    }
}
