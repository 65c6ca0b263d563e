// ABOUTME: Schedule data model shared by the resolver, diff engine and REST client
// ABOUTME: Mirrors the backend's JSON shapes (camelCase, dates as YYYY-MM-DD)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::{to_instant, DEFAULT_TIME};

/// Catalog entry for a recurring chore. Owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// "HH:MM"
    pub default_start_time: String,
    /// Minutes
    pub default_duration: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Family member reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Where a resolved assignment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSource {
    Template,
    Override,
}

/// A task materialized for one calendar day after merging template defaults with overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTask {
    pub task_id: String,
    /// `None` means unassigned
    pub member_id: Option<String>,
    pub task: Task,
    #[serde(default)]
    pub member: Option<Member>,
    pub source: TaskSource,
    #[serde(default)]
    pub override_time: Option<String>,
    #[serde(default)]
    pub override_duration: Option<u32>,
}

impl ResolvedTask {
    /// Override time if present, otherwise the task's default start time
    pub fn effective_time(&self) -> &str {
        self.override_time
            .as_deref()
            .unwrap_or(&self.task.default_start_time)
    }

    /// Override duration if present, otherwise the task's default duration
    pub fn effective_duration(&self) -> u32 {
        self.override_duration.unwrap_or(self.task.default_duration)
    }

    pub fn is_assigned_to(&self, member_id: &str) -> bool {
        self.member_id.as_deref() == Some(member_id)
    }

    /// Start instant of this task on `date`
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        to_instant(date, self.effective_time())
    }
}

/// One day of a resolved week. Tasks are not sorted by time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<ResolvedTask>,
}

/// Reference to the week template a schedule was resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTemplateRef {
    pub id: String,
    pub name: String,
}

/// A full week as returned by `GET /weeks/{weekStart}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWeekSchedule {
    /// Always a Monday
    pub week_start_date: NaiveDate,
    /// Monday through Sunday, no gaps
    pub days: Vec<ResolvedDay>,
    #[serde(default)]
    pub base_template: Option<WeekTemplateRef>,
    #[serde(default)]
    pub has_overrides: bool,
}

impl ResolvedWeekSchedule {
    /// An empty week starting at `week_start_date`
    pub fn empty(week_start_date: NaiveDate) -> Self {
        let days = (0..7)
            .map(|offset| ResolvedDay {
                date: week_start_date + chrono::Duration::days(offset),
                tasks: Vec::new(),
            })
            .collect();

        Self {
            week_start_date,
            days,
            base_template: None,
            has_overrides: false,
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&ResolvedDay> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn task_count(&self) -> usize {
        self.days.iter().map(|day| day.tasks.len()).sum()
    }
}

/// An entry of a day template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTemplateItem {
    pub task_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub override_time: Option<String>,
    #[serde(default)]
    pub override_duration: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverrideAction {
    Add,
    Remove,
    Reassign,
}

impl std::fmt::Display for OverrideAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OverrideAction::Add => "ADD",
            OverrideAction::Remove => "REMOVE",
            OverrideAction::Reassign => "REASSIGN",
        };
        write!(f, "{}", label)
    }
}

/// Day-scoped command diverging a day's schedule from its template.
/// The backend is the system of record; the client only sends these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverride {
    pub assigned_date: NaiveDate,
    pub task_id: String,
    pub action: OverrideAction,
    pub original_member_id: Option<String>,
    pub new_member_id: Option<String>,
    pub override_time: Option<String>,
    pub override_duration: Option<u32>,
}

/// Body of `POST /weeks/override`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverrideRequest {
    pub week_start_date: NaiveDate,
    pub task_overrides: Vec<TaskOverride>,
    pub replace_existing: bool,
}

/// Where a member stands relative to the shift stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShiftInfo {
    /// The member is on shift until `end_time`
    #[serde(rename_all = "camelCase")]
    Current {
        end_time: NaiveDateTime,
        time_remaining: String,
    },
    /// The member's next shift starts at `start_time`
    #[serde(rename_all = "camelCase")]
    Next {
        start_time: NaiveDateTime,
        time_until_start: String,
    },
}

impl ShiftInfo {
    pub fn is_current(&self) -> bool {
        matches!(self, ShiftInfo::Current { .. })
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            color: None,
            icon: None,
            default_start_time: DEFAULT_TIME.to_string(),
            default_duration: 0,
            is_active: true,
        }
    }
}
