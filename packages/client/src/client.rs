use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use choreboard_config::ClientConfig;
use choreboard_core::constants::{WEEKS_PATH, WEEK_OVERRIDE_PATH, WIRE_DATE_FORMAT};
use choreboard_core::{
    validate_week, ResolvedWeekSchedule, ScheduleSource, SourceError, TaskOverride,
    WeekOverrideRequest,
};

use crate::api::ApiError;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the week schedule endpoints
#[derive(Clone)]
pub struct ScheduleClient {
    http_client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl ScheduleClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    /// Build a client from loaded configuration, carrying its token if set
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let mut client = Self::new(config.api_url.clone(), config.http_timeout)?;
        if let Some(token) = &config.token {
            client.set_access_token(token.clone());
        }
        Ok(client)
    }

    pub fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch the resolved schedule for the week whose Monday is `week_start`
    pub async fn get_week(&self, week_start: NaiveDate) -> ClientResult<ResolvedWeekSchedule> {
        let url = self.url(&format!(
            "{}/{}",
            WEEKS_PATH,
            week_start.format(WIRE_DATE_FORMAT)
        ));
        debug!("Fetching week schedule from {}", url);

        let response = self.authorize(self.http_client.get(&url)).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let week: ResolvedWeekSchedule = serde_json::from_str(&body)
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
                validate_week(&week)?;
                Ok(week)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(format!(
                "week starting {}",
                week_start
            ))),
            _ => Err(error_from_response(response).await),
        }
    }

    /// Submit override commands for one week.
    ///
    /// Failures here are the only ones meant to reach a person; use
    /// [`ClientError::user_message`] to present them.
    pub async fn submit_overrides(
        &self,
        week_start: NaiveDate,
        overrides: Vec<TaskOverride>,
        replace_existing: bool,
    ) -> ClientResult<()> {
        let request = WeekOverrideRequest {
            week_start_date: week_start,
            task_overrides: overrides,
            replace_existing,
        };

        let url = self.url(WEEK_OVERRIDE_PATH);
        info!(
            "Submitting {} override(s) for week {}",
            request.task_overrides.len(),
            week_start
        );

        let response = self
            .authorize(self.http_client.post(&url))
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let err = error_from_response(response).await;
        warn!("Override submission failed: {}", err);
        Err(err)
    }
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ApiError>(&text)
        .ok()
        .and_then(|body| body.reason().map(str::to_string))
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text.trim().to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::auth(reason),
        StatusCode::NOT_FOUND => ClientError::NotFound(reason),
        _ => ClientError::api(status.as_u16(), reason),
    }
}

#[async_trait]
impl ScheduleSource for ScheduleClient {
    async fn fetch_week(&self, week_start: NaiveDate) -> Result<ResolvedWeekSchedule, SourceError> {
        match self.get_week(week_start).await {
            Ok(week) => Ok(week),
            Err(ClientError::NotFound(_)) => Err(SourceError::NotFound(week_start)),
            Err(err) => Err(err.into()),
        }
    }
}
