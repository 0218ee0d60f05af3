//! Persistent on-disk snapshot of the product catalog.
//!
//! Lets the app compute with the last known catalog when the backend is
//! unreachable at startup. Orders are never snapshotted; they change too
//! often to be useful stale.

use std::{
    fs,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Product;

const STOCK_CACHE_FILENAME: &str = "stock_cache.json";

/// Catalog snapshots older than this are ignored; prices and weights drift.
pub const STOCK_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCache {
    /// Unix timestamp (seconds) when this snapshot was taken.
    pub cached_at: u64,
    pub products: Vec<Product>,
}

impl StockCache {
    pub fn new(products: Vec<Product>) -> Self {
        let cached_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            cached_at,
            products,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > STOCK_CACHE_TTL
    }

    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    /// The snapshot time as a `SystemTime`, for the cache bookkeeping.
    pub fn fetched_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.cached_at)
    }

    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

fn stock_cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("order-profit-desk");
        let _ = fs::create_dir_all(&base);
        base.join(STOCK_CACHE_FILENAME)
    })
    .clone()
}

/// Loads the catalog snapshot, if one exists and has not expired.
pub fn load_stock_cache() -> Option<StockCache> {
    let path = stock_cache_path();

    if !path.exists() {
        debug!(path = %path.display(), "no catalog snapshot on disk");
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<StockCache>(&content) {
            Ok(cache) => {
                if cache.is_expired() {
                    debug!(age = %cache.age_string(), "catalog snapshot expired");
                    return None;
                }
                debug!(
                    count = cache.products.len(),
                    age = %cache.age_string(),
                    "loaded catalog snapshot"
                );
                Some(cache)
            }
            Err(err) => {
                warn!(%err, "failed to parse catalog snapshot");
                None
            }
        },
        Err(err) => {
            warn!(%err, "failed to read catalog snapshot");
            None
        }
    }
}

/// Saves the catalog snapshot to disk.
pub fn save_stock_cache(cache: &StockCache) -> Result<(), std::io::Error> {
    let path = stock_cache_path();
    let content = serde_json::to_string(cache)?; // compact, catalogs can be large
    fs::write(&path, content)?;
    debug!(
        count = cache.products.len(),
        path = %path.display(),
        "saved catalog snapshot"
    );
    Ok(())
}
