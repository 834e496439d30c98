mod client;
pub mod nodepool;
pub mod zuul;

pub use client::FeedClient;
pub use nodepool::CapacityConfig;
pub use zuul::{ChangeItem, JobRun, PipelineSnapshot};
