// ABOUTME: Schedule algorithms: shift resolution, shift grouping and template diffing
// ABOUTME: Also hosts the poller that keeps a member's shift status fresh

pub mod diff;
pub mod poller;
pub mod shift;

#[cfg(test)]
mod fixtures;

pub use diff::{diff, DiffOutcome, TemplateDiff};
pub use poller::{local_clock, Clock, RequestTracker, ShiftPoller, ShiftSnapshot, DEFAULT_POLL_INTERVAL};
pub use shift::{group_shifts, Shift, ShiftResolver};
