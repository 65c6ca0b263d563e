/// Number of days in a resolved week
pub const DAYS_PER_WEEK: usize = 7;

/// REST path prefix for resolved weeks (`GET /weeks/{weekStart}`)
pub const WEEKS_PATH: &str = "weeks";

/// REST path for override submission (`POST /weeks/override`)
pub const WEEK_OVERRIDE_PATH: &str = "weeks/override";

/// Date format used on the wire for week and day dates
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";
