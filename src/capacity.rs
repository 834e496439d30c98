use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::feeds::{CapacityConfig, FeedClient};

/// Source of the nodepool configuration document.
pub trait CapacitySource {
    fn fetch_capacity_config(&self) -> impl Future<Output = Result<CapacityConfig>> + Send;
}

impl CapacitySource for FeedClient {
    fn fetch_capacity_config(&self) -> impl Future<Output = Result<CapacityConfig>> + Send {
        FeedClient::fetch_capacity_config(self)
    }
}

/// Wall-clock abstraction so refresh timing can be driven in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedCapacity {
    max_jobs: u32,
    refreshed_at: DateTime<Utc>,
}

/// Caches the total job capacity of the allow-listed resource pools.
///
/// The capacity is refetched at most once per `refresh_interval`. A failed
/// refresh propagates to the caller and leaves the previous value in place,
/// so the next call retries.
pub struct CapacityCache<C: Clock = SystemClock> {
    pools: Vec<String>,
    refresh_interval: Duration,
    clock: C,
    cached: Mutex<Option<CachedCapacity>>,
}

impl CapacityCache<SystemClock> {
    pub fn new(pools: Vec<String>, refresh_interval: Duration) -> Self {
        Self::with_clock(pools, refresh_interval, SystemClock)
    }
}

impl<C: Clock> CapacityCache<C> {
    pub fn with_clock(pools: Vec<String>, refresh_interval: Duration, clock: C) -> Self {
        Self {
            pools,
            refresh_interval,
            clock,
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached capacity, refreshing it from `source` when stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity document cannot be fetched or decoded,
    /// or if an allow-listed pool is missing from it.
    pub async fn get_capacity<S: CapacitySource + Sync>(&self, source: &S) -> Result<u32> {
        // Held across the fetch so concurrent callers share a single refresh
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(entry) = *cached {
            if now - entry.refreshed_at < self.refresh_interval {
                debug!("Using cached capacity of {} jobs", entry.max_jobs);
                return Ok(entry.max_jobs);
            }
        }

        info!("Refreshing nodepool capacity data");
        let config = source.fetch_capacity_config().await?;
        let max_jobs = config.total_servers(&self.pools)?;

        *cached = Some(CachedCapacity {
            max_jobs,
            refreshed_at: now,
        });
        info!("Capacity across {} pools is {max_jobs} jobs", self.pools.len());

        Ok(max_jobs)
    }
}
