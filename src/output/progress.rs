use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{done, pending};

/// Spinner shown while the feeds are fetched
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start(queue_name: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {msg} {spinner}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(pending(format!("Fetching status of {queue_name}")).to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb
            .finish_with_message(done("Fetched queue status ✓").to_string());
        eprintln!();
    }

    pub fn abandon(self) {
        self.pb.abandon();
    }
}
