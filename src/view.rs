use serde::{Deserialize, Serialize};

/// Everything the dashboard renders for one queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueView {
    pub queue_name: String,
    pub running: usize,
    pub queued: usize,
    pub complete: usize,
    /// `running + queued`
    pub active: usize,
    /// `running + queued + complete`
    pub total: usize,
    pub max_jobs: u32,
    /// Estimated time to drain the queue, `HH:MM`
    pub queue_time: String,
    pub changes: Vec<ChangeView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeView {
    pub number: usize,
    /// Time since the first job launched, `HH:MM`
    pub total: String,
    pub id: String,
    pub url: String,
    pub project: String,
    pub user: String,
    pub jobs: Vec<JobView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub number: usize,
    pub name: String,
    pub state: JobState,
    pub elapsed: String,
    /// Estimated time to completion, `HH:MM`
    pub etc: String,
    pub link: String,
}

impl JobView {
    pub fn color(&self) -> &'static str {
        self.state.color()
    }

    pub fn weight(&self) -> &'static str {
        self.state.weight()
    }

    /// Inline CSS for the job's row.
    pub fn style(&self) -> String {
        format!("color: {}; font-weight: {}", self.color(), self.weight())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Waiting for a node
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn color(self) -> &'static str {
        match self {
            Self::Queued => "blue",
            Self::Running | Self::Succeeded => "green",
            Self::Failed => "red",
        }
    }

    pub fn weight(self) -> &'static str {
        match self {
            Self::Queued | Self::Running => "normal",
            Self::Succeeded | Self::Failed => "bold",
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}
