use chrono::{DateTime, Utc};

use crate::error::{QueueStatusError, Result};
use crate::feeds::{ChangeItem, JobRun, PipelineSnapshot};
use crate::time_format::format_duration;
use crate::view::{ChangeView, JobState, JobView, QueueView};

/// Assumed average wall-clock duration of one job, in hours.
pub const JOB_TIME_HOURS: f64 = 1.83333;

const NAME_PREFIX: &str = "centos-7-";

/// Running totals carried through every change and job of a pipeline.
#[derive(Debug, Clone, Copy)]
struct Tally {
    changes: usize,
    jobs: usize,
    running: usize,
    queued: usize,
    complete: usize,
    /// ETC of the most recently processed job, not a sum
    queue_time: Option<u64>,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            changes: 0,
            jobs: 0,
            running: 0,
            queued: 0,
            complete: 0,
            queue_time: Some(0),
        }
    }
}

impl Tally {
    fn count(mut self, state: JobState) -> Self {
        match state {
            JobState::Queued => self.queued += 1,
            JobState::Running => self.running += 1,
            JobState::Succeeded | JobState::Failed => self.complete += 1,
        }
        self
    }
}

/// Builds the dashboard view of the pipeline named `queue_name`.
///
/// Only the change under test in the first head of each change queue is
/// shown; queues without heads are skipped. Job numbers run across the whole
/// pipeline. Each job's ETC is the number of jobs ahead of it that have not
/// completed, times the average gap between completions at full `capacity`.
///
/// # Errors
///
/// Returns `QueueNotFound` if the snapshot has no pipeline with that name.
pub fn aggregate(
    snapshot: &PipelineSnapshot,
    queue_name: &str,
    capacity: u32,
    now: DateTime<Utc>,
) -> Result<QueueView> {
    let pipeline = snapshot
        .pipelines
        .iter()
        .find(|p| p.name == queue_name)
        .ok_or_else(|| QueueStatusError::QueueNotFound(queue_name.to_string()))?;

    let rate = completion_rate(capacity);

    let (tally, changes) = pipeline
        .change_queues
        .iter()
        .filter_map(|queue| queue.active_change())
        .fold((Tally::default(), Vec::new()), |(tally, mut changes), change| {
            let (tally, view) = change_view(tally, change, rate, now);
            changes.push(view);
            (tally, changes)
        });

    Ok(QueueView {
        queue_name: queue_name.to_string(),
        running: tally.running,
        queued: tally.queued,
        complete: tally.complete,
        active: tally.running + tally.queued,
        total: tally.running + tally.queued + tally.complete,
        max_jobs: capacity,
        queue_time: format_duration(tally.queue_time),
        changes,
    })
}

/// Average minutes between job completions when every node is busy.
///
/// `None` when there is no capacity to complete anything.
fn completion_rate(capacity: u32) -> Option<f64> {
    (capacity > 0).then(|| 60.0 / (f64::from(capacity) / JOB_TIME_HOURS))
}

fn change_view(
    tally: Tally,
    change: &ChangeItem,
    rate: Option<f64>,
    now: DateTime<Utc>,
) -> (Tally, ChangeView) {
    let mut tally = Tally {
        changes: tally.changes + 1,
        ..tally
    };

    let mut view = ChangeView {
        number: tally.changes,
        total: format_duration(Some(elapsed_since_launch(change, now))),
        id: change.id.clone().unwrap_or_default(),
        url: change.url.clone().unwrap_or_default(),
        project: change.project.clone(),
        user: change
            .owner
            .as_ref()
            .map(|owner| owner.username.clone())
            .unwrap_or_default(),
        jobs: Vec::with_capacity(change.jobs.len()),
    };

    for job in &change.jobs {
        let (next, job_view) = job_view(tally, job, rate);
        tally = next;
        view.jobs.push(job_view);
    }

    (tally, view)
}

/// Milliseconds since the change's first job launched, clamped at zero.
///
/// Changes without jobs, or whose first job has no launch time, measure from
/// `now` and so always report zero.
fn elapsed_since_launch(change: &ChangeItem, now: DateTime<Utc>) -> u64 {
    let now_ms = now.timestamp_millis();

    #[allow(clippy::cast_possible_truncation)]
    let launched_ms = change
        .jobs
        .first()
        .and_then(|job| job.launch_time)
        .map_or(now_ms, |seconds| (seconds * 1000.0) as i64);

    u64::try_from(now_ms.saturating_sub(launched_ms)).unwrap_or(0)
}

fn job_view(tally: Tally, job: &JobRun, rate: Option<f64>) -> (Tally, JobView) {
    let state = job_state(job);
    let tally = tally.count(state);

    let link = if state.is_complete() {
        job.report_url.clone()
    } else {
        job.url.clone()
    }
    .unwrap_or_default();

    // Jobs ahead of this one that have not completed yet
    #[allow(clippy::cast_precision_loss)]
    let ahead = tally.jobs as f64 - tally.complete as f64;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let queue_time = rate.map(|minutes| (ahead * minutes * 60_000.0).trunc().max(0.0) as u64);

    let tally = Tally {
        jobs: tally.jobs + 1,
        queue_time,
        ..tally
    };

    let view = JobView {
        number: tally.jobs,
        name: display_name(&job.name).to_string(),
        state,
        elapsed: format_duration(job.elapsed_time),
        etc: format_duration(queue_time),
        link,
    };

    (tally, view)
}

fn job_state(job: &JobRun) -> JobState {
    match (job.elapsed_time, job.result.as_deref()) {
        (None, _) => JobState::Queued,
        (Some(_), None) => JobState::Running,
        (Some(_), Some("FAILURE")) => JobState::Failed,
        (Some(_), Some(_)) => JobState::Succeeded,
    }
}

/// Strips everything up to and including the first `centos-7-`.
fn display_name(name: &str) -> &str {
    name.split_once(NAME_PREFIX).map_or(name, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::zuul::{ChangeQueue, Owner, Pipeline};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2017-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn queued_job(name: &str) -> JobRun {
        JobRun {
            name: name.to_string(),
            url: None,
            elapsed_time: None,
            result: None,
            report_url: None,
            launch_time: None,
        }
    }

    fn running_job(name: &str, elapsed_ms: u64) -> JobRun {
        JobRun {
            url: Some(format!("telnet://logs/{name}")),
            elapsed_time: Some(elapsed_ms),
            ..queued_job(name)
        }
    }

    fn finished_job(name: &str, elapsed_ms: u64, result: &str) -> JobRun {
        JobRun {
            result: Some(result.to_string()),
            report_url: Some(format!("http://logs.openstack.org/{name}")),
            ..running_job(name, elapsed_ms)
        }
    }

    fn change(id: &str, jobs: Vec<JobRun>) -> ChangeItem {
        ChangeItem {
            id: Some(id.to_string()),
            url: Some(format!("https://review.openstack.org/{id}")),
            project: "openstack/tripleo-heat-templates".to_string(),
            owner: Some(Owner {
                username: "jdoe".to_string(),
            }),
            jobs,
        }
    }

    fn queue_of(changes: Vec<ChangeItem>) -> ChangeQueue {
        ChangeQueue {
            heads: if changes.is_empty() { vec![] } else { vec![changes] },
        }
    }

    fn snapshot(queues: Vec<ChangeQueue>) -> PipelineSnapshot {
        PipelineSnapshot {
            pipelines: vec![
                Pipeline {
                    name: "gate".to_string(),
                    change_queues: vec![queue_of(vec![change("9,9", vec![queued_job("x")])])],
                },
                Pipeline {
                    name: "check-tripleo".to_string(),
                    change_queues: queues,
                },
            ],
        }
    }

    fn all_jobs(view: &QueueView) -> Vec<&JobView> {
        view.changes.iter().flat_map(|c| c.jobs.iter()).collect()
    }

    #[test]
    fn test_unknown_queue_is_not_found() {
        let snap = snapshot(vec![]);
        let err = aggregate(&snap, "nonexistent-queue", 100, now()).unwrap_err();
        assert!(matches!(err, QueueStatusError::QueueNotFound(name) if name == "nonexistent-queue"));
    }

    #[test]
    fn test_single_queued_job() {
        let snap = snapshot(vec![queue_of(vec![change("1,1", vec![queued_job("tempest")])])]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        assert_eq!(view.queued, 1);
        assert_eq!(view.running, 0);
        assert_eq!(view.complete, 0);
        assert_eq!(view.active, 1);
        assert_eq!(view.total, 1);
        assert_eq!(view.queue_name, "check-tripleo");
        assert_eq!(view.max_jobs, 100);

        let job = &view.changes[0].jobs[0];
        assert_eq!(job.color(), "blue");
        assert_eq!(job.weight(), "normal");
        assert_eq!(job.link, "");
        assert_eq!(job.elapsed, "??:??");
        assert_eq!(job.etc, "00:00");
    }

    #[test]
    fn test_failed_job() {
        let snap = snapshot(vec![queue_of(vec![change(
            "1,1",
            vec![finished_job("tempest", 5000, "FAILURE")],
        )])]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        assert_eq!(view.complete, 1);
        let job = &view.changes[0].jobs[0];
        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.color(), "red");
        assert_eq!(job.weight(), "bold");
        assert_eq!(job.link, "http://logs.openstack.org/tempest");
    }

    #[test]
    fn test_other_results_are_green_and_bold() {
        let snap = snapshot(vec![queue_of(vec![change(
            "1,1",
            vec![
                finished_job("a", 5000, "SUCCESS"),
                finished_job("b", 5000, "POST_FAILURE"),
            ],
        )])]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        for job in all_jobs(&view) {
            assert_eq!(job.color(), "green");
            assert_eq!(job.weight(), "bold");
        }
        assert_eq!(view.complete, 2);
    }

    #[test]
    fn test_running_job_links_to_live_log() {
        let snap = snapshot(vec![queue_of(vec![change(
            "1,1",
            vec![running_job("tempest", 120_000)],
        )])]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        let job = &view.changes[0].jobs[0];
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.color(), "green");
        assert_eq!(job.weight(), "normal");
        assert_eq!(job.link, "telnet://logs/tempest");
        assert_eq!(job.elapsed, "00:02");
        assert_eq!(view.running, 1);
    }

    #[test]
    fn test_centos_prefix_is_stripped() {
        assert_eq!(display_name("centos-7-tempest"), "tempest");
        assert_eq!(display_name("gate-tripleo-ci-centos-7-ovb-ha"), "ovb-ha");
        assert_eq!(display_name("tripleo-ci-fedora"), "tripleo-ci-fedora");
        // Only the first occurrence is stripped
        assert_eq!(display_name("centos-7-upgrade-centos-7-ha"), "upgrade-centos-7-ha");

        let snap = snapshot(vec![queue_of(vec![change("1,1", vec![queued_job("centos-7-tempest")])])]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();
        assert_eq!(view.changes[0].jobs[0].name, "tempest");
    }

    #[test]
    fn test_counters_add_up() {
        let snap = snapshot(vec![
            queue_of(vec![change(
                "1,1",
                vec![
                    finished_job("a", 1000, "SUCCESS"),
                    running_job("b", 1000),
                    queued_job("c"),
                ],
            )]),
            queue_of(vec![]),
            queue_of(vec![change(
                "2,1",
                vec![queued_job("d"), finished_job("e", 1000, "FAILURE")],
            )]),
            queue_of(vec![change("3,1", vec![])]),
        ]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        assert_eq!(view.running, 1);
        assert_eq!(view.queued, 2);
        assert_eq!(view.complete, 2);
        assert_eq!(view.active, 3);
        assert_eq!(view.total, 5);
        assert_eq!(view.running + view.queued + view.complete, view.total);
    }

    #[test]
    fn test_items_without_a_change_in_other_pipelines() {
        let json = r#"{"pipelines": [
            {"name": "periodic", "change_queues": [
                {"heads": [[{"id": null, "url": null, "project": "openstack/tripleo-ci",
                             "owner": null, "jobs": [{"name": "periodic-tripleo-ci"}]}]]}
            ]},
            {"name": "check-tripleo", "change_queues": [
                {"heads": [[{"id": "1,1", "url": null, "project": "openstack/tripleo-common",
                             "owner": {"username": "jdoe"}, "jobs": [{"name": "centos-7-tempest"}]}]]}
            ]}
        ]}"#;
        let snap: PipelineSnapshot = serde_json::from_str(json).unwrap();

        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();
        assert_eq!(view.total, 1);
        assert_eq!(view.changes[0].user, "jdoe");

        let periodic = aggregate(&snap, "periodic", 100, now()).unwrap();
        assert_eq!(periodic.changes[0].id, "");
        assert_eq!(periodic.changes[0].user, "");
        assert_eq!(periodic.queued, 1);
    }

    #[test]
    fn test_job_numbers_span_changes() {
        let snap = snapshot(vec![
            queue_of(vec![change("1,1", vec![queued_job("a"), queued_job("b")])]),
            queue_of(vec![change("2,1", vec![])]),
            queue_of(vec![change("3,1", vec![queued_job("c"), queued_job("d"), queued_job("e")])]),
        ]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        let numbers: Vec<usize> = all_jobs(&view).iter().map(|j| j.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_queues_consume_no_change_number() {
        let snap = snapshot(vec![
            queue_of(vec![]),
            queue_of(vec![change("1,1", vec![queued_job("a")])]),
            queue_of(vec![]),
            queue_of(vec![change("2,1", vec![queued_job("b")])]),
        ]);
        let view = aggregate(&snap, "check-tripleo", 100, now()).unwrap();

        assert_eq!(view.changes.len(), 2);
        assert_eq!(view.changes[0].number, 1);
        assert_eq!(view.changes[0].id, "1,1");
        assert_eq!(view.changes[1].number, 2);
        assert_eq!(view.changes[1].id, "2,1");
    }

    #[test]
    fn test_last_change_of_first_head_is_shown() {
        let queue = ChangeQueue {
            heads: vec![
                vec![change("1,1", vec![]), change("2,1", vec![queued_job("a")])],
                vec![change("3,1", vec![queued_job("b")])],
            ],
        };
        let view = aggregate(&snapshot(vec![queue]), "check-tripleo", 100, now()).unwrap();

        assert_eq!(view.changes.len(), 1);
        assert_eq!(view.changes[0].id, "2,1");
        assert_eq!(view.changes[0].user, "jdoe");
        assert_eq!(view.changes[0].url, "https://review.openstack.org/2,1");
        assert_eq!(view.total, 1);
    }

    #[test]
    fn test_etc_counts_incomplete_jobs_ahead() {
        // 60 nodes, 1.83333h per job: one completion every 1.83333 minutes
        let snap = snapshot(vec![queue_of(vec![change(
            "1,1",
            vec![
                queued_job("a"),
                queued_job("b"),
                queued_job("c"),
                queued_job("d"),
            ],
        )])]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();

        let etcs: Vec<&str> = all_jobs(&view).iter().map(|j| j.etc.as_str()).collect();
        // 0, 1.83, 3.67, 5.5 minutes
        assert_eq!(etcs, vec!["00:00", "00:01", "00:03", "00:05"]);
        assert_eq!(view.queue_time, "00:05");
    }

    #[test]
    fn test_completed_jobs_are_not_ahead() {
        let snap = snapshot(vec![queue_of(vec![change(
            "1,1",
            vec![
                finished_job("a", 1000, "SUCCESS"),
                finished_job("b", 1000, "SUCCESS"),
                queued_job("c"),
            ],
        )])]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();

        let etcs: Vec<&str> = all_jobs(&view).iter().map(|j| j.etc.as_str()).collect();
        // Completed jobs clamp at zero; the queued job has nothing ahead of it
        assert_eq!(etcs, vec!["00:00", "00:00", "00:00"]);
    }

    #[test]
    fn test_queue_time_is_last_jobs_etc() {
        let snap = snapshot(vec![
            queue_of(vec![change(
                "1,1",
                (0..10).map(|i| queued_job(&format!("job-{i}"))).collect(),
            )]),
            queue_of(vec![change("2,1", vec![finished_job("z", 1000, "SUCCESS")])]),
        ]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();

        // Last job: 10 ahead, 1 complete => 9 * 1.83333 minutes
        let last = all_jobs(&view).last().unwrap().etc.clone();
        assert_eq!(last, "00:16");
        assert_eq!(view.queue_time, last);
    }

    #[test]
    fn test_queue_time_without_jobs() {
        let snap = snapshot(vec![queue_of(vec![change("1,1", vec![])])]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();
        assert_eq!(view.queue_time, "00:00");
        assert_eq!(view.total, 0);
    }

    #[test]
    fn test_zero_capacity_has_unknown_etc() {
        let snap = snapshot(vec![queue_of(vec![change("1,1", vec![queued_job("a")])])]);
        let view = aggregate(&snap, "check-tripleo", 0, now()).unwrap();
        assert_eq!(view.changes[0].jobs[0].etc, "??:??");
        assert_eq!(view.queue_time, "??:??");
    }

    #[test]
    fn test_change_total_from_first_launch() {
        let launched = now().timestamp() as f64 - 3_720.5;
        let first = JobRun {
            launch_time: Some(launched),
            ..running_job("a", 1000)
        };
        let later = JobRun {
            launch_time: Some(now().timestamp() as f64),
            ..running_job("b", 1000)
        };
        let snap = snapshot(vec![queue_of(vec![change("1,1", vec![first, later])])]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();

        assert_eq!(view.changes[0].total, "01:02");
    }

    #[test]
    fn test_change_total_without_launch_is_zero() {
        let snap = snapshot(vec![
            queue_of(vec![change("1,1", vec![])]),
            queue_of(vec![change("2,1", vec![queued_job("a")])]),
        ]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();

        assert_eq!(view.changes[0].total, "00:00");
        assert_eq!(view.changes[1].total, "00:00");
    }

    #[test]
    fn test_future_launch_time_clamps_to_zero() {
        let job = JobRun {
            launch_time: Some(now().timestamp() as f64 + 600.0),
            ..running_job("a", 1000)
        };
        let snap = snapshot(vec![queue_of(vec![change("1,1", vec![job])])]);
        let view = aggregate(&snap, "check-tripleo", 60, now()).unwrap();
        assert_eq!(view.changes[0].total, "00:00");
    }
}
