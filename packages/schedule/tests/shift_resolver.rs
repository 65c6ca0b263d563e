//! Shift resolution tests, including lookahead into the following week

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

use choreboard_core::{
    ResolvedTask, ResolvedWeekSchedule, ScheduleSource, ShiftInfo, SourceError, Task, TaskSource,
};
use choreboard_schedule::ShiftResolver;

mock! {
    Source {}

    #[async_trait]
    impl ScheduleSource for Source {
        async fn fetch_week(&self, week_start: NaiveDate) -> Result<ResolvedWeekSchedule, SourceError>;
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, 0).unwrap()
}

fn this_monday() -> NaiveDate {
    date(2024, 3, 4)
}

fn next_monday() -> NaiveDate {
    date(2024, 3, 11)
}

fn task(task_id: &str, member_id: Option<&str>, time: &str) -> ResolvedTask {
    ResolvedTask {
        task_id: task_id.to_string(),
        member_id: member_id.map(str::to_string),
        task: Task {
            id: task_id.to_string(),
            name: task_id.to_string(),
            default_start_time: time.to_string(),
            default_duration: 30,
            ..Task::default()
        },
        member: None,
        source: TaskSource::Template,
        override_time: None,
        override_duration: None,
    }
}

/// Build a week from (day offset, task) pairs
fn week(start: NaiveDate, tasks: Vec<(usize, ResolvedTask)>) -> ResolvedWeekSchedule {
    let mut week = ResolvedWeekSchedule::empty(start);
    for (offset, task) in tasks {
        week.days[offset].tasks.push(task);
    }
    week
}

fn source_never_called() -> MockSource {
    let mut source = MockSource::new();
    source.expect_fetch_week().never();
    source
}

fn source_returning(result: Result<ResolvedWeekSchedule, SourceError>) -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_fetch_week()
        .with(eq(next_monday()))
        .times(1)
        .returning(move |_| result.clone());
    source
}

fn resolver(source: MockSource) -> ShiftResolver {
    ShiftResolver::new(Arc::new(source))
}

#[tokio::test]
async fn test_sunday_night_shift_ends_at_next_monday_first_task() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("B"), "07:00")),
            (6, task("dinner", Some("A"), "20:00")),
        ],
    );
    let next = week(
        next_monday(),
        vec![
            (0, task("wake", Some("B"), "07:00")),
            (0, task("school", Some("A"), "08:00")),
        ],
    );

    let now = at(date(2024, 3, 10), 23, 0);
    let info = resolver(source_returning(Ok(next)))
        .resolve(now, "A", &current)
        .await;

    assert_eq!(
        info,
        Some(ShiftInfo::Current {
            end_time: at(next_monday(), 7, 0),
            time_remaining: "8h0m".to_string(),
        })
    );
}

#[tokio::test]
async fn test_shift_runs_through_next_week_falls_back_to_its_end() {
    let current = week(this_monday(), vec![(6, task("dinner", Some("A"), "20:00"))]);
    let next = week(next_monday(), vec![(2, task("dinner", Some("A"), "20:00"))]);

    let now = at(date(2024, 3, 10), 21, 0);
    let info = resolver(source_returning(Ok(next)))
        .resolve(now, "A", &current)
        .await
        .unwrap();

    let expected_end = date(2024, 3, 17).and_hms_milli_opt(23, 59, 59, 999).unwrap();
    assert_eq!(
        info,
        ShiftInfo::Current {
            end_time: expected_end,
            time_remaining: "170h59m".to_string(),
        }
    );
}

#[tokio::test]
async fn test_failed_lookahead_falls_back_to_current_week_end() {
    let current = week(this_monday(), vec![(6, task("dinner", Some("A"), "20:00"))]);

    let now = at(date(2024, 3, 10), 21, 0);
    let info = resolver(source_returning(Err(SourceError::Unavailable(
        "connection refused".to_string(),
    ))))
    .resolve(now, "A", &current)
    .await
    .unwrap();

    let expected_end = date(2024, 3, 10).and_hms_milli_opt(23, 59, 59, 999).unwrap();
    assert_eq!(
        info,
        ShiftInfo::Current {
            end_time: expected_end,
            time_remaining: "2h59m".to_string(),
        }
    );
}

#[tokio::test]
async fn test_shift_boundary_is_other_members_task_not_own_end() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("A"), "07:00")),
            (0, task("school", Some("A"), "08:00")),
            (0, task("pickup", Some("B"), "15:00")),
        ],
    );

    let now = at(this_monday(), 7, 10);
    let info = resolver(source_never_called())
        .resolve(now, "A", &current)
        .await;

    assert_eq!(
        info,
        Some(ShiftInfo::Current {
            end_time: at(this_monday(), 15, 0),
            time_remaining: "7h50m".to_string(),
        })
    );
}

#[tokio::test]
async fn test_unassigned_task_ends_shift() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("A"), "07:00")),
            (0, task("lunch", None, "12:00")),
        ],
    );

    let info = resolver(source_never_called())
        .resolve(at(this_monday(), 9, 0), "A", &current)
        .await
        .unwrap();

    assert!(info.is_current());
    assert_eq!(
        info,
        ShiftInfo::Current {
            end_time: at(this_monday(), 12, 0),
            time_remaining: "3h0m".to_string(),
        }
    );
}

#[tokio::test]
async fn test_next_shift_before_anything_started() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("B"), "07:00")),
            (1, task("wake", Some("A"), "07:00")),
        ],
    );

    let info = resolver(source_never_called())
        .resolve(at(this_monday(), 6, 15), "A", &current)
        .await;

    assert_eq!(
        info,
        Some(ShiftInfo::Next {
            start_time: at(date(2024, 3, 5), 7, 0),
            time_until_start: "24h45m".to_string(),
        })
    );
}

#[tokio::test]
async fn test_nothing_started_and_no_user_task_skips_lookahead() {
    let current = week(this_monday(), vec![(0, task("wake", Some("B"), "07:00"))]);

    let info = resolver(source_never_called())
        .resolve(at(this_monday(), 6, 0), "A", &current)
        .await;

    assert_eq!(info, None);
}

#[tokio::test]
async fn test_next_shift_later_this_week() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("B"), "07:00")),
            (2, task("dinner", Some("A"), "18:00")),
        ],
    );

    let info = resolver(source_never_called())
        .resolve(at(this_monday(), 9, 0), "A", &current)
        .await
        .unwrap();

    assert_eq!(
        info,
        ShiftInfo::Next {
            start_time: at(date(2024, 3, 6), 18, 0),
            time_until_start: "57h0m".to_string(),
        }
    );
}

#[tokio::test]
async fn test_next_shift_found_in_following_week() {
    let current = week(this_monday(), vec![(0, task("wake", Some("B"), "07:00"))]);
    let next = week(
        next_monday(),
        vec![
            (0, task("wake", Some("B"), "07:00")),
            (1, task("dinner", Some("A"), "18:00")),
        ],
    );

    let info = resolver(source_returning(Ok(next)))
        .resolve(at(date(2024, 3, 10), 12, 0), "A", &current)
        .await;

    assert_eq!(
        info,
        Some(ShiftInfo::Next {
            start_time: at(date(2024, 3, 12), 18, 0),
            time_until_start: "54h0m".to_string(),
        })
    );
}

#[rstest]
#[case::next_week_empty(Ok(ResolvedWeekSchedule::empty(next_monday())))]
#[case::fetch_fails(Err(SourceError::NotFound(next_monday())))]
#[tokio::test]
async fn test_no_next_shift_within_lookahead(
    #[case] next: Result<ResolvedWeekSchedule, SourceError>,
) {
    let current = week(this_monday(), vec![(0, task("wake", Some("B"), "07:00"))]);

    let info = resolver(source_returning(next))
        .resolve(at(date(2024, 3, 10), 12, 0), "A", &current)
        .await;

    assert_eq!(info, None);
}

#[tokio::test]
async fn test_week_without_user_tasks_is_none() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("B"), "07:00")),
            (3, task("dinner", None, "18:00")),
        ],
    );
    let next = week(next_monday(), vec![(0, task("wake", Some("B"), "07:00"))]);

    for now in [at(this_monday(), 6, 0), at(date(2024, 3, 8), 12, 0)] {
        let mut source = MockSource::new();
        let next = next.clone();
        source
            .expect_fetch_week()
            .returning(move |_| Ok(next.clone()));

        let info = resolver(source).resolve(now, "A", &current).await;
        assert_eq!(info, None);
    }
}

#[tokio::test]
async fn test_task_starting_exactly_now_counts_as_past() {
    let current = week(
        this_monday(),
        vec![
            (0, task("wake", Some("A"), "07:00")),
            (0, task("school", Some("B"), "08:00")),
        ],
    );

    let info = resolver(source_never_called())
        .resolve(at(this_monday(), 7, 0), "A", &current)
        .await;

    assert_eq!(
        info,
        Some(ShiftInfo::Current {
            end_time: at(this_monday(), 8, 0),
            time_remaining: "1h0m".to_string(),
        })
    );
}

#[tokio::test]
async fn test_override_time_moves_task_in_sort_order() {
    let mut moved = task("dinner", Some("B"), "18:00");
    moved.override_time = Some("06:30".to_string());
    let current = week(
        this_monday(),
        vec![(0, task("wake", Some("A"), "07:00")), (0, moved)],
    );

    let info = resolver(source_never_called())
        .resolve(at(this_monday(), 6, 45), "A", &current)
        .await;

    assert_eq!(
        info,
        Some(ShiftInfo::Next {
            start_time: at(this_monday(), 7, 0),
            time_until_start: "15m".to_string(),
        })
    );
}
