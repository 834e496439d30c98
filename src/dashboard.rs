use chrono::Utc;
use log::info;

use crate::aggregate::aggregate;
use crate::capacity::CapacityCache;
use crate::error::Result;
use crate::feeds::FeedClient;
use crate::view::QueueView;

/// Ties the feeds, the capacity cache and the aggregator together.
///
/// The status feed is fetched on every call; capacity comes from the cache.
pub struct Dashboard {
    feeds: FeedClient,
    capacity: CapacityCache,
}

impl Dashboard {
    pub fn new(feeds: FeedClient, capacity: CapacityCache) -> Self {
        Self { feeds, capacity }
    }

    /// Builds the current view of `queue_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if either feed cannot be fetched or decoded, if a
    /// capacity pool is missing, or if the queue is not in the status feed.
    pub async fn queue_view(&self, queue_name: &str) -> Result<QueueView> {
        let snapshot = self.feeds.fetch_status().await?;
        let max_jobs = self.capacity.get_capacity(&self.feeds).await?;

        let view = aggregate(&snapshot, queue_name, max_jobs, Utc::now())?;
        info!(
            "Queue {queue_name}: {} changes, {} active jobs, {} complete",
            view.changes.len(),
            view.active,
            view.complete
        );

        Ok(view)
    }
}
