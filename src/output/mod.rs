mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::FetchProgress;
pub use styling::{dim, magenta_bold};
pub use summary::print_summary;

/// Prints the banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚦 zuul-queue-status"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Zuul gating queue dashboard")
    );
}
