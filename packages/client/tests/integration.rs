//! Integration tests for the schedule REST client

use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use choreboard_client::{ClientError, ScheduleClient};
use choreboard_core::{OverrideAction, ScheduleSource, SourceError, TaskOverride};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn week_json(start: NaiveDate) -> serde_json::Value {
    let days: Vec<_> = (0..7)
        .map(|offset| {
            let date = start + chrono::Duration::days(offset);
            json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "tasks": [{
                    "taskId": "wash",
                    "memberId": "a",
                    "task": {
                        "id": "wash",
                        "name": "Dishes",
                        "defaultStartTime": "18:30",
                        "defaultDuration": 20,
                        "isActive": true
                    },
                    "member": {"id": "a", "name": "Alex"},
                    "source": "template",
                    "overrideTime": null,
                    "overrideDuration": null
                }]
            })
        })
        .collect();

    json!({
        "weekStartDate": start.format("%Y-%m-%d").to_string(),
        "days": days,
        "baseTemplate": null,
        "hasOverrides": false
    })
}

async fn client_for(server: &MockServer) -> ScheduleClient {
    let mut client =
        ScheduleClient::new(format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
    client.set_access_token("secret".to_string());
    client
}

#[tokio::test]
async fn test_get_week_sends_bearer_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weeks/2024-03-04"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_json(monday())))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let week = client.get_week(monday()).await.unwrap();

    assert_eq!(week.week_start_date, monday());
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.task_count(), 7);
    assert_eq!(week.days[0].tasks[0].member_id.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_get_week_rejects_malformed_week() {
    let server = MockServer::start().await;
    let mut body = week_json(monday());
    body["days"].as_array_mut().unwrap().pop();

    Mock::given(method("GET"))
        .and(path("/api/weeks/2024-03-04"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_week(monday()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_fetch_week_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weeks/2024-03-04"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.fetch_week(monday()).await.unwrap_err();
    assert_eq!(err, SourceError::NotFound(monday()));
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weeks/2024-03-04"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized", "message": "Token expired"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_week(monday()).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.to_string(), "Authentication error: Token expired");
}

#[tokio::test]
async fn test_submit_overrides_posts_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/weeks/override"))
        .and(body_partial_json(json!({
            "weekStartDate": "2024-03-04",
            "replaceExisting": false,
            "taskOverrides": [{
                "assignedDate": "2024-03-05",
                "taskId": "cook",
                "action": "ADD",
                "newMemberId": "b"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let overrides = vec![TaskOverride {
        assigned_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        task_id: "cook".to_string(),
        action: OverrideAction::Add,
        original_member_id: None,
        new_member_id: Some("b".to_string()),
        override_time: None,
        override_duration: None,
    }];

    client.submit_overrides(monday(), overrides, false).await.unwrap();
}

#[tokio::test]
async fn test_submit_overrides_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/weeks/override"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Task cook is inactive"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .submit_overrides(monday(), Vec::new(), true)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 422, .. }));
    assert_eq!(
        err.user_message(),
        "The server rejected the change: Task cook is inactive"
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = ScheduleClient::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
    let err = client.get_week(monday()).await.unwrap_err();
    assert!(err.is_network_error());
}
