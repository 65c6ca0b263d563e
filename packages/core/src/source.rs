// ABOUTME: Seam through which schedule consumers fetch resolved weeks
// ABOUTME: Implemented by the REST client and by test doubles

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::types::ResolvedWeekSchedule;

/// Failure to obtain a week from a schedule source
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Schedule source unavailable: {0}")]
    Unavailable(String),

    #[error("Week starting {0} not found")]
    NotFound(NaiveDate),

    #[error("Invalid schedule: {0}")]
    Invalid(String),
}

/// Anything that can produce the resolved schedule for a week
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetch the week whose Monday is `week_start`
    async fn fetch_week(&self, week_start: NaiveDate) -> Result<ResolvedWeekSchedule, SourceError>;
}
