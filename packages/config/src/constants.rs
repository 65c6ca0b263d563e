// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Choreboard

// Backend endpoints
pub const CHOREBOARD_API_URL: &str = "CHOREBOARD_API_URL";
pub const CHOREBOARD_EVENTS_URL: &str = "CHOREBOARD_EVENTS_URL";

// Identity
pub const CHOREBOARD_TOKEN: &str = "CHOREBOARD_TOKEN";
pub const CHOREBOARD_USER_ID: &str = "CHOREBOARD_USER_ID";

// Shift polling
pub const CHOREBOARD_POLL_INTERVAL_SECS: &str = "CHOREBOARD_POLL_INTERVAL_SECS";

// Realtime reconnection
pub const CHOREBOARD_MAX_RECONNECT_ATTEMPTS: &str = "CHOREBOARD_MAX_RECONNECT_ATTEMPTS";

// HTTP client
pub const CHOREBOARD_HTTP_TIMEOUT_SECS: &str = "CHOREBOARD_HTTP_TIMEOUT_SECS";
