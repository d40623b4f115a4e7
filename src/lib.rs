pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::cache::TtlCache;
use crate::services::booking::BookingService;
use crate::store::postgres::PostgresStore;
use crate::store::BookingStore;

// Shared state for the whole application
pub struct AppState {
    pub db: database::Database,
    pub store: Arc<dyn BookingStore>,
    pub bookings: BookingService,
    pub seat_cache: TtlCache<String>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let store: Arc<dyn BookingStore> = Arc::new(PostgresStore::new(db.pool.clone()));
        let bookings = BookingService::new(store.clone());

        Ok(Arc::new(Self {
            db,
            store,
            bookings,
            seat_cache: TtlCache::new(),
            config,
        }))
    }
}
