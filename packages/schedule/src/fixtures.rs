// ABOUTME: Builders for resolved tasks and weeks used by unit tests

use chrono::NaiveDate;

use choreboard_core::{ResolvedTask, Task, TaskSource};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A template task with a 30 minute default duration starting at `time`
pub fn assigned(task_id: &str, member_id: Option<&str>, time: &str) -> ResolvedTask {
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
