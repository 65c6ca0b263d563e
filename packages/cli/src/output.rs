//! Plain-text rendering of schedule results. Colors are added by the binary.

use chrono::{NaiveDate, NaiveDateTime};

use choreboard_core::{OverrideAction, ResolvedTask, ShiftInfo, TaskOverride};
use choreboard_schedule::{DiffOutcome, Shift, TemplateDiff};

const TIME_FORMAT: &str = "%a %H:%M";

pub fn describe_shift(info: Option<&ShiftInfo>) -> String {
    match info {
        Some(ShiftInfo::Current {
            end_time,
            time_remaining,
        }) => format!(
            "On shift until {} ({} left)",
            end_time.format(TIME_FORMAT),
            time_remaining
        ),
        Some(ShiftInfo::Next {
            start_time,
            time_until_start,
        }) => format!(
            "Next shift starts {} (in {})",
            start_time.format(TIME_FORMAT),
            time_until_start
        ),
        None => "No shift scheduled in the next week".to_string(),
    }
}

fn member_label(task: &ResolvedTask) -> String {
    match (&task.member, &task.member_id) {
        (Some(member), _) => member.name.clone(),
        (None, Some(id)) => id.clone(),
        (None, None) => "Unassigned".to_string(),
    }
}

fn clock(instant: NaiveDateTime) -> String {
    instant.format("%H:%M").to_string()
}

/// One line per shift: "07:00-08:30  Alex  wake, school"
pub fn describe_shifts(shifts: &[Shift]) -> Vec<String> {
    shifts
        .iter()
        .map(|shift| {
            let who = shift
                .tasks
                .first()
                .map(member_label)
                .unwrap_or_else(|| "Unassigned".to_string());
            let names: Vec<&str> = shift.tasks.iter().map(|t| t.task.name.as_str()).collect();
            format!(
                "{}-{}  {}  {}",
                clock(shift.start),
                clock(shift.end),
                who,
                names.join(", ")
            )
        })
        .collect()
}

fn or_unassigned(member: &Option<String>) -> &str {
    member.as_deref().unwrap_or("unassigned")
}

pub fn describe_override(command: &TaskOverride) -> String {
    let mut line = match command.action {
        OverrideAction::Add => format!(
            "ADD {} -> {}",
            command.task_id,
            or_unassigned(&command.new_member_id)
        ),
        OverrideAction::Remove => format!(
            "REMOVE {} (was {})",
            command.task_id,
            or_unassigned(&command.original_member_id)
        ),
        OverrideAction::Reassign => format!(
            "REASSIGN {} {} -> {}",
            command.task_id,
            or_unassigned(&command.original_member_id),
            or_unassigned(&command.new_member_id)
        ),
    };

    if let Some(time) = &command.override_time {
        line.push_str(&format!(" at {}", time));
    }
    if let Some(duration) = command.override_duration {
        line.push_str(&format!(" for {}m", duration));
    }
    line
}

pub fn describe_outcome(date: NaiveDate, plan: &TemplateDiff) -> String {
    match plan.outcome {
        DiffOutcome::NoChanges => format!("{} already matches the template", date),
        DiffOutcome::ClearDay => format!(
            "Template is empty: all {} task(s) on {} will be removed",
            plan.overrides.len(),
            date
        ),
        DiffOutcome::Changes => format!("{} override(s) needed for {}", plan.overrides.len(), date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn instant(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_describe_shift() {
        let current = ShiftInfo::Current {
            end_time: instant(15, 0),
            time_remaining: "7h50m".to_string(),
        };
        assert_eq!(
            describe_shift(Some(&current)),
            "On shift until Mon 15:00 (7h50m left)"
        );
        assert_eq!(
            describe_shift(None),
            "No shift scheduled in the next week"
        );
    }

    #[test]
    fn test_describe_override() {
        let command = TaskOverride {
            assigned_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            task_id: "wash".to_string(),
            action: OverrideAction::Reassign,
            original_member_id: Some("A".to_string()),
            new_member_id: None,
            override_time: Some("19:00".to_string()),
            override_duration: None,
        };
        assert_eq!(
            describe_override(&command),
            "REASSIGN wash A -> unassigned at 19:00"
        );
    }
}
