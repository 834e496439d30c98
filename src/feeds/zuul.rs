use serde::{Deserialize, Serialize};

/// A Zuul `status.json` document.
///
/// Only the fields the dashboard renders are modelled; everything else in the
/// feed is ignored during decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub pipelines: Vec<Pipeline>,
}

/// A named gating pipeline (e.g. "check-tripleo").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    #[serde(default)]
    pub change_queues: Vec<ChangeQueue>,
}

/// An ordered bundle of changes tested together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeQueue {
    /// Each head is a tuple of changes; the last item is the one under test.
    #[serde(default)]
    pub heads: Vec<Vec<ChangeItem>>,
}

impl ChangeQueue {
    /// The change under test in the first head, if the queue has any.
    pub fn active_change(&self) -> Option<&ChangeItem> {
        self.heads.first().and_then(|head| head.last())
    }
}

/// A code change under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeItem {
    /// Gerrit change id, e.g. "123456,7"; null for ref-triggered items
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub project: String,
    /// Null for items without a Gerrit change (periodic, tag, ref-updated)
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub jobs: Vec<JobRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub username: String,
}

/// One CI job execution tied to a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRun {
    pub name: String,
    /// Live console link while the job runs
    #[serde(default)]
    pub url: Option<String>,
    /// Milliseconds since the job started; `None` until a node picks it up
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    /// Final result; `None` while the job is still running
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub report_url: Option<String>,
    /// Epoch seconds at which the job was launched
    #[serde(default)]
    pub launch_time: Option<f64>,
}
