// ABOUTME: Core types, time arithmetic and validation for the Choreboard client
// ABOUTME: Foundational package shared by the schedule, client and realtime packages

pub mod constants;
pub mod source;
pub mod time;
pub mod types;
pub mod validation;

// Re-export main types
pub use types::{
    DayTemplateItem, Member, OverrideAction, ResolvedDay, ResolvedTask, ResolvedWeekSchedule,
    ShiftInfo, Task, TaskOverride, TaskSource, WeekOverrideRequest, WeekTemplateRef,
};

pub use source::{ScheduleSource, SourceError};

// Re-export time helpers
pub use time::{
    add_minutes, end_of_week, format_between, format_remaining, next_week_start, to_instant,
    week_start_of,
};

pub use validation::{validate_week, ScheduleValidationError};
