// ABOUTME: Names of server-pushed events and what the client does with each one
// ABOUTME: Builds the human readable message for events that produce a notification

use serde_json::Value;

pub const JOIN_REQUEST_CREATED: &str = "join-request-created";
pub const JOIN_REQUEST_APPROVED: &str = "join-request-approved";
pub const JOIN_REQUEST_REJECTED: &str = "join-request-rejected";
pub const MEMBER_JOINED: &str = "member-joined";
pub const FAMILY_UPDATED: &str = "family-updated";
pub const MEMBER_ROLE_CHANGED: &str = "member-role-changed";
pub const TASK_ASSIGNED: &str = "task-assigned";
pub const TASK_UNASSIGNED: &str = "task-unassigned";
pub const TASK_SCHEDULE_UPDATED: &str = "task-schedule-updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    JoinRequestCreated,
    JoinRequestApproved,
    JoinRequestRejected,
    MemberJoined,
    FamilyUpdated,
    MemberRoleChanged,
    TaskAssigned,
    TaskUnassigned,
    TaskScheduleUpdated,
}

impl EventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            JOIN_REQUEST_CREATED => EventKind::JoinRequestCreated,
            JOIN_REQUEST_APPROVED => EventKind::JoinRequestApproved,
            JOIN_REQUEST_REJECTED => EventKind::JoinRequestRejected,
            MEMBER_JOINED => EventKind::MemberJoined,
            FAMILY_UPDATED => EventKind::FamilyUpdated,
            MEMBER_ROLE_CHANGED => EventKind::MemberRoleChanged,
            TASK_ASSIGNED => EventKind::TaskAssigned,
            TASK_UNASSIGNED => EventKind::TaskUnassigned,
            TASK_SCHEDULE_UPDATED => EventKind::TaskScheduleUpdated,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::JoinRequestCreated => JOIN_REQUEST_CREATED,
            EventKind::JoinRequestApproved => JOIN_REQUEST_APPROVED,
            EventKind::JoinRequestRejected => JOIN_REQUEST_REJECTED,
            EventKind::MemberJoined => MEMBER_JOINED,
            EventKind::FamilyUpdated => FAMILY_UPDATED,
            EventKind::MemberRoleChanged => MEMBER_ROLE_CHANGED,
            EventKind::TaskAssigned => TASK_ASSIGNED,
            EventKind::TaskUnassigned => TASK_UNASSIGNED,
            EventKind::TaskScheduleUpdated => TASK_SCHEDULE_UPDATED,
        }
    }

    /// Schedule refreshes are technical and never reach the notification log
    pub fn creates_notification(&self) -> bool {
        !matches!(self, EventKind::TaskScheduleUpdated)
    }

    /// Role changes are only surfaced as notifications
    pub fn fans_out(&self) -> bool {
        !matches!(self, EventKind::MemberRoleChanged)
    }

    pub fn notification_message(&self, data: &Value) -> String {
        let server_message = text(data, "message");
        let family = text(data, "familyName");

        match self {
            EventKind::JoinRequestCreated => {
                let requester = data
                    .get("joinRequest")
                    .and_then(|request| {
                        text(request, "userName").or_else(|| {
                            request.get("user").and_then(|user| text(user, "name"))
                        })
                    });
                match requester {
                    Some(name) => format!("{} asked to join your family", name),
                    None => "New request to join your family".to_string(),
                }
            }
            EventKind::JoinRequestApproved => server_message.unwrap_or_else(|| match family {
                Some(family) => format!("Your request to join {} was approved", family),
                None => "Your join request was approved".to_string(),
            }),
            EventKind::JoinRequestRejected => server_message.unwrap_or_else(|| match family {
                Some(family) => format!("Your request to join {} was declined", family),
                None => "Your join request was declined".to_string(),
            }),
            EventKind::MemberJoined => "A new member joined your family".to_string(),
            EventKind::FamilyUpdated => "Family details were updated".to_string(),
            EventKind::MemberRoleChanged => {
                server_message.unwrap_or_else(|| "A family member's role changed".to_string())
            }
            EventKind::TaskAssigned => {
                server_message.unwrap_or_else(|| "You have been assigned a task".to_string())
            }
            EventKind::TaskUnassigned => {
                server_message.unwrap_or_else(|| "A task was unassigned from you".to_string())
            }
            EventKind::TaskScheduleUpdated => "The schedule was updated".to_string(),
        }
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
