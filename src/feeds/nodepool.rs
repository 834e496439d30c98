use serde::{Deserialize, Serialize};

use crate::error::{QueueStatusError, Result};

/// The subset of a nodepool configuration needed to compute capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityConfig {
    pub providers: Vec<Provider>,
}

/// A cloud provider (resource pool) in the nodepool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    /// Only required for pools that count towards capacity
    #[serde(rename = "max-servers", default)]
    pub max_servers: Option<u32>,
}

impl CapacityConfig {
    /// Sums `max-servers` across the named pools.
    ///
    /// # Errors
    ///
    /// Returns `MissingPool` if a named pool is not in the document, and
    /// `MissingMaxServers` if it is present without a `max-servers` value.
    pub fn total_servers(&self, pools: &[String]) -> Result<u32> {
        pools.iter().try_fold(0u32, |total, pool| {
            let provider = self
                .providers
                .iter()
                .find(|p| &p.name == pool)
                .ok_or_else(|| QueueStatusError::MissingPool(pool.clone()))?;

            let max_servers = provider
                .max_servers
                .ok_or_else(|| QueueStatusError::MissingMaxServers(pool.clone()))?;

            Ok(total.saturating_add(max_servers))
        })
    }
}
