use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use crate::config::BookingConfig;
use crate::store::BookingStore;

/// Periodically deletes unconfirmed bookings older than the grace window,
/// returning their seats to the pool.
///
/// Runs independently of request traffic and takes no show lock: it only
/// ever removes bookings that are by definition outside the confirmed
/// occupancy set the admission pipeline consults.
pub struct ExpirySweeper {
    store: Arc<dyn BookingStore>,
    grace: chrono::Duration,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn BookingStore>, config: &BookingConfig) -> Self {
        Self {
            store,
            grace: chrono::Duration::minutes(config.hold_grace_minutes),
            interval: Duration::from_secs(config.sweep_interval_secs),
        }
    }

    pub async fn run(self) {
        loop {
            tokio::time::sleep(self.interval).await;
            self.sweep_once().await;
        }
    }

    /// One sweep pass. Returns how many stale bookings were reclaimed.
    pub async fn sweep_once(&self) -> u64 {
        let cutoff = Utc::now() - self.grace;
        match self.store.delete_stale_unconfirmed(cutoff).await {
            Ok(0) => 0,
            Ok(count) => {
                info!("🧹 Cleaned up {} expired bookings", count);
                count
            }
            Err(e) => {
                error!("Failed to clean up expired bookings: {:?}", e);
                0
            }
        }
    }
}
