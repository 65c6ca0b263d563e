// ABOUTME: Typed REST client for week schedules and override submission
// ABOUTME: Also serves as the production ScheduleSource for shift resolution

pub mod api;
pub mod client;
pub mod error;

pub use client::ScheduleClient;
pub use error::{ClientError, ClientResult};
