use comfy_table::Cell;

use super::styling::{dim, heading, state_count};
use super::tables::{create_table, job_state_cell};
use crate::view::{JobState, QueueView};

/// Prints a queue view as a header line plus one table row per job.
pub fn print_summary(view: &QueueView) {
    println!(
        "{}  {}/{}  {}  complete {}  active {}  total {}  queue time {}",
        heading(&view.queue_name),
        state_count(JobState::Running, view.running),
        view.max_jobs,
        state_count(JobState::Queued, view.queued),
        view.complete,
        view.active,
        view.total,
        view.queue_time
    );

    if view.changes.is_empty() {
        println!("{}", dim("No changes in this queue."));
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["#", "Change", "Project", "Owner", "Job", "State", "Elapsed", "ETC"]);

    for change in &view.changes {
        let label = format!("{}. {} ({})", change.number, change.id, change.total);
        if change.jobs.is_empty() {
            table.add_row(vec![
                Cell::new(""),
                Cell::new(&label),
                Cell::new(&change.project),
                Cell::new(&change.user),
                Cell::new(dim("no jobs")),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
            ]);
            continue;
        }

        for job in &change.jobs {
            table.add_row(vec![
                Cell::new(job.number),
                Cell::new(&label),
                Cell::new(&change.project),
                Cell::new(&change.user),
                Cell::new(&job.name),
                job_state_cell(job.state),
                Cell::new(&job.elapsed),
                Cell::new(&job.etc),
            ]);
        }
    }

    println!("{table}");
}
