// ABOUTME: Computes the override commands that make a day match a day template
// ABOUTME: Two linear passes: removals first, then additions and changes in template order

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use choreboard_core::{to_instant, DayTemplateItem, OverrideAction, ResolvedTask, TaskOverride};

/// What applying a template to a day amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffOutcome {
    /// The day already matches the template
    NoChanges,
    /// The template is empty; every current task is removed
    ClearDay,
    Changes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDiff {
    pub date: NaiveDate,
    pub outcome: DiffOutcome,
    pub overrides: Vec<TaskOverride>,
}

impl TemplateDiff {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn count(&self, action: OverrideAction) -> usize {
        self.overrides
            .iter()
            .filter(|o| o.action == action)
            .count()
    }
}

/// Diff one day's resolved tasks against a day template
pub fn diff(date: NaiveDate, current: &[ResolvedTask], items: &[DayTemplateItem]) -> TemplateDiff {
    let mut overrides = Vec::new();

    for task in current {
        if !items.iter().any(|item| item.task_id == task.task_id) {
            overrides.push(remove(date, task));
        }
    }

    for item in items {
        let existing = match current.iter().find(|task| task.task_id == item.task_id) {
            Some(task) => task,
            None => {
                overrides.push(add(date, item));
                continue;
            }
        };

        let target_time = item
            .override_time
            .as_deref()
            .unwrap_or(&existing.task.default_start_time);
        let target_duration = item
            .override_duration
            .unwrap_or(existing.task.default_duration);
        let time_changed = to_instant(date, target_time) != existing.start_on(date);
        let duration_changed = target_duration != existing.effective_duration();

        if existing.member_id != item.member_id {
            overrides.push(TaskOverride {
                assigned_date: date,
                task_id: item.task_id.clone(),
                action: OverrideAction::Reassign,
                original_member_id: existing.member_id.clone(),
                new_member_id: item.member_id.clone(),
                override_time: time_changed.then(|| target_time.to_string()),
                override_duration: duration_changed.then_some(target_duration),
            });
        } else if time_changed || duration_changed {
            // Reassignment cannot retime a task on its own
            overrides.push(remove(date, existing));
            overrides.push(add(date, item));
        }
    }

    let outcome = if overrides.is_empty() {
        DiffOutcome::NoChanges
    } else if items.is_empty() {
        DiffOutcome::ClearDay
    } else {
        DiffOutcome::Changes
    };

    debug!(
        "Template diff for {}: {} override(s), {:?}",
        date,
        overrides.len(),
        outcome
    );

    TemplateDiff {
        date,
        outcome,
        overrides,
    }
}

fn remove(date: NaiveDate, task: &ResolvedTask) -> TaskOverride {
    TaskOverride {
        assigned_date: date,
        task_id: task.task_id.clone(),
        action: OverrideAction::Remove,
        original_member_id: task.member_id.clone(),
        new_member_id: None,
        override_time: None,
        override_duration: None,
    }
}

fn add(date: NaiveDate, item: &DayTemplateItem) -> TaskOverride {
    TaskOverride {
        assigned_date: date,
        task_id: item.task_id.clone(),
        action: OverrideAction::Add,
        original_member_id: None,
        new_member_id: item.member_id.clone(),
        override_time: item.override_time.clone(),
        override_duration: item.override_duration,
    }
}
