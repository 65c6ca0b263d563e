// ABOUTME: Structural checks for resolved week schedules received from the backend
// ABOUTME: Enforces the Monday-start, seven consecutive days invariant

use chrono::{Datelike, Duration, Weekday};
use thiserror::Error;

use crate::constants::DAYS_PER_WEEK;
use crate::types::ResolvedWeekSchedule;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleValidationError {
    #[error("Week must start on a Monday, got {0}")]
    NotMonday(chrono::NaiveDate),

    #[error("Week must contain {expected} days, got {actual}")]
    WrongDayCount { expected: usize, actual: usize },

    #[error("Day {index} should be {expected} but is {actual}")]
    DayOutOfOrder {
        index: usize,
        expected: chrono::NaiveDate,
        actual: chrono::NaiveDate,
    },
}

/// Check that `week` starts on a Monday and lists Monday..Sunday without gaps
pub fn validate_week(week: &ResolvedWeekSchedule) -> Result<(), ScheduleValidationError> {
    if week.week_start_date.weekday() != Weekday::Mon {
        return Err(ScheduleValidationError::NotMonday(week.week_start_date));
    }

    if week.days.len() != DAYS_PER_WEEK {
        return Err(ScheduleValidationError::WrongDayCount {
            expected: DAYS_PER_WEEK,
            actual: week.days.len(),
        });
    }

    for (index, day) in week.days.iter().enumerate() {
        let expected = week.week_start_date + Duration::days(index as i64);
        if day.date != expected {
            return Err(ScheduleValidationError::DayOutOfOrder {
                index,
                expected,
                actual: day.date,
            });
        }
    }

    Ok(())
}
