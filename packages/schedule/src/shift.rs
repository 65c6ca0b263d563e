// ABOUTME: Decides whether a member is on shift now or when their next shift starts
// ABOUTME: Looks at most one week ahead when the current week has no answer

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use choreboard_core::{
    add_minutes, end_of_week, format_between, next_week_start, ResolvedTask,
    ResolvedWeekSchedule, ScheduleSource, ShiftInfo,
};

/// A task paired with its start instant on the day it is scheduled
#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
    task: &'a ResolvedTask,
    start: NaiveDateTime,
}

/// Flatten a week into slots sorted by start instant.
/// The sort is stable so ties keep day order, then task order within the day.
fn flatten(week: &ResolvedWeekSchedule) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot<'_>> = week
        .days
        .iter()
        .flat_map(|day| {
            day.tasks.iter().map(move |task| Slot {
                task,
                start: task.start_on(day.date),
            })
        })
        .collect();

    slots.sort_by_key(|slot| slot.start);
    slots
}

fn first_for_user<'a>(slots: &[Slot<'a>], user_id: &str) -> Option<Slot<'a>> {
    slots
        .iter()
        .find(|slot| slot.task.is_assigned_to(user_id))
        .copied()
}

/// First slot assigned to anyone else. Unassigned tasks count as someone else.
fn first_for_other<'a>(slots: &[Slot<'a>], user_id: &str) -> Option<Slot<'a>> {
    slots
        .iter()
        .find(|slot| !slot.task.is_assigned_to(user_id))
        .copied()
}

fn next_shift(now: NaiveDateTime, start: NaiveDateTime) -> ShiftInfo {
    ShiftInfo::Next {
        start_time: start,
        time_until_start: format_between(now, start),
    }
}

fn current_shift(now: NaiveDateTime, end: NaiveDateTime) -> ShiftInfo {
    ShiftInfo::Current {
        end_time: end,
        time_remaining: format_between(now, end),
    }
}

/// Resolves shift status against a week snapshot, fetching the following
/// week through a [`ScheduleSource`] when needed.
#[derive(Clone)]
pub struct ShiftResolver {
    source: Arc<dyn ScheduleSource>,
}

impl ShiftResolver {
    pub fn new(source: Arc<dyn ScheduleSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn ScheduleSource> {
        &self.source
    }

    /// Where `user_id` stands at `now` within `current_week`.
    ///
    /// Returns `None` when the user has nothing scheduled within the
    /// lookahead. A shift ends where another member's task begins, never at
    /// the end of the user's own task.
    pub async fn resolve(
        &self,
        now: NaiveDateTime,
        user_id: &str,
        current_week: &ResolvedWeekSchedule,
    ) -> Option<ShiftInfo> {
        let slots = flatten(current_week);
        let split = slots.partition_point(|slot| slot.start <= now);
        let (past, future) = slots.split_at(split);

        let most_recent = match past.last() {
            Some(slot) => slot,
            None => {
                // Nothing has started yet this week
                return first_for_user(future, user_id).map(|slot| next_shift(now, slot.start));
            }
        };

        if !most_recent.task.is_assigned_to(user_id) {
            if let Some(slot) = first_for_user(future, user_id) {
                return Some(next_shift(now, slot.start));
            }
            return self
                .next_week_first_task(current_week.week_start_date, user_id)
                .await
                .map(|start| next_shift(now, start));
        }

        if let Some(boundary) = first_for_other(future, user_id) {
            return Some(current_shift(now, boundary.start));
        }

        let end = self
            .cross_week_shift_end(current_week.week_start_date, user_id)
            .await;
        Some(current_shift(now, end))
    }

    /// Start of the user's first task next week, if any
    async fn next_week_first_task(
        &self,
        week_start: NaiveDate,
        user_id: &str,
    ) -> Option<NaiveDateTime> {
        let next_start = next_week_start(week_start);
        match self.source.fetch_week(next_start).await {
            Ok(next_week) => {
                let slots = flatten(&next_week);
                first_for_user(&slots, user_id).map(|slot| slot.start)
            }
            Err(e) => {
                warn!("Failed to fetch week {} for next shift lookahead: {}", next_start, e);
                None
            }
        }
    }

    /// End of a shift that runs through the end of the current week
    async fn cross_week_shift_end(&self, week_start: NaiveDate, user_id: &str) -> NaiveDateTime {
        let next_start = next_week_start(week_start);
        match self.source.fetch_week(next_start).await {
            Ok(next_week) => {
                let slots = flatten(&next_week);
                match first_for_other(&slots, user_id) {
                    Some(boundary) => boundary.start,
                    None => {
                        debug!("No other member scheduled in week {}", next_start);
                        end_of_week(next_start)
                    }
                }
            }
            Err(e) => {
                // TODO: surface this once product decides whether a failed lookahead should hide the end time
                warn!(
                    "Failed to fetch week {} for shift end, falling back to end of week {}: {}",
                    next_start, week_start, e
                );
                end_of_week(week_start)
            }
        }
    }
}

/// Maximal run of consecutive same-member tasks on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub member_id: Option<String>,
    pub start: NaiveDateTime,
    /// End of the last task in the run
    pub end: NaiveDateTime,
    pub tasks: Vec<ResolvedTask>,
}

/// Group one day's tasks into shifts.
///
/// Tasks are sorted by effective start first. Adjacency is by sort order
/// only; gaps between tasks do not split a shift.
pub fn group_shifts(date: NaiveDate, tasks: &[ResolvedTask]) -> Vec<Shift> {
    let mut sorted: Vec<&ResolvedTask> = tasks.iter().collect();
    sorted.sort_by_key(|task| task.start_on(date));

    let mut shifts: Vec<Shift> = Vec::new();
    for task in sorted {
        let start = task.start_on(date);
        let end = add_minutes(start, i64::from(task.effective_duration()));

        match shifts.last_mut() {
            Some(shift) if shift.member_id == task.member_id => {
                shift.end = shift.end.max(end);
                shift.tasks.push(task.clone());
            }
            _ => shifts.push(Shift {
                member_id: task.member_id.clone(),
                start,
                end,
                tasks: vec![task.clone()],
            }),
        }
    }

    shifts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assigned, date};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flatten_sorts_stably_across_days() {
        let mut week = ResolvedWeekSchedule::empty(date(2024, 3, 4));
        week.days[1].tasks = vec![assigned("b", Some("B"), "09:00"), assigned("a", Some("A"), "07:00")];
        week.days[0].tasks = vec![assigned("c", Some("A"), "20:00"), assigned("d", Some("B"), "20:00")];

        let order: Vec<&str> = flatten(&week).iter().map(|s| s.task.task_id.as_str()).collect();
        assert_eq!(order, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_group_shifts_merges_consecutive_member_runs() {
        let day = date(2024, 3, 4);
        let tasks = vec![
            assigned("cook", Some("A"), "18:00"),
            assigned("wake", Some("A"), "07:00"),
            assigned("school", Some("A"), "08:00"),
            assigned("pickup", Some("B"), "15:00"),
            assigned("lunch", None, "12:00"),
        ];

        let shifts = group_shifts(day, &tasks);
        let summary: Vec<(Option<&str>, usize)> = shifts
            .iter()
            .map(|s| (s.member_id.as_deref(), s.tasks.len()))
            .collect();

        assert_eq!(
            summary,
            vec![(Some("A"), 2), (None, 1), (Some("B"), 1), (Some("A"), 1)]
        );
        assert_eq!(shifts[0].start, day.and_hms_opt(7, 0, 0).unwrap());
        assert_eq!(shifts[0].end, day.and_hms_opt(8, 30, 0).unwrap());
    }

    #[test]
    fn test_group_shifts_empty_day() {
        assert!(group_shifts(date(2024, 3, 4), &[]).is_empty());
    }
}
