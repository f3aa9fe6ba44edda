//! Calendar REST API Client
//!
//! HTTP client for the calendar service. One HTTP call per operation, no
//! retries and no caching.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::dto::{ChatReply, ChatRequest, DeleteAck};
use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::model::{Activity, ActivityDraft, ActivityId};

/// Operations offered by the calendar service
///
/// Views depend on this trait rather than on [`ApiClient`] so they can run
/// against an in-memory service in tests.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// `GET /api/activities`
    async fn get_activities(&self) -> ApiResult<Vec<Activity>>;

    /// `GET /api/activities/{id}`
    async fn get_activity(&self, id: &ActivityId) -> ApiResult<Activity>;

    /// `POST /api/activities`
    async fn create_activity(&self, draft: &ActivityDraft) -> ApiResult<Activity>;

    /// `PUT /api/activities/{id}`
    async fn update_activity(&self, id: &ActivityId, draft: &ActivityDraft) -> ApiResult<Activity>;

    /// `DELETE /api/activities/{id}`
    async fn delete_activity(&self, id: &ActivityId) -> ApiResult<DeleteAck>;

    /// `POST /api/chat`
    async fn send_chat_message(&self, message: &str) -> ApiResult<ChatReply>;
}

/// `reqwest`-backed implementation of [`CalendarApi`]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base(), path)
    }

    fn activity_url(&self, id: &ActivityId) -> String {
        self.url(&format!(
            "/api/activities/{}",
            urlencoding::encode(&id.to_string())
        ))
    }
}

/// Turn a response into `T`, or into an [`ApiError`] built from its body
async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "Request rejected");
        return Err(err);
    }

    Ok(response.json::<T>().await?)
}

/// Convert listed rows, skipping any the server stored in a shape we cannot read
fn parse_activities(rows: Vec<serde_json::Value>) -> Vec<Activity> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Activity>(row.clone()) {
            Ok(activity) => Some(activity),
            Err(e) => {
                tracing::warn!(error = %e, %row, "Skipping unreadable activity");
                None
            }
        })
        .collect()
}

#[async_trait]
impl CalendarApi for ApiClient {
    async fn get_activities(&self) -> ApiResult<Vec<Activity>> {
        let url = self.url("/api/activities");
        tracing::debug!(%url, "GET activities");

        let response = self.client.get(&url).send().await?;
        let rows: Vec<serde_json::Value> = decode(response).await?;
        Ok(parse_activities(rows))
    }

    async fn get_activity(&self, id: &ActivityId) -> ApiResult<Activity> {
        let url = self.activity_url(id);
        tracing::debug!(%url, "GET activity");

        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> ApiResult<Activity> {
        let url = self.url("/api/activities");
        tracing::debug!(%url, title = %draft.title, "POST activity");

        let response = self.client.post(&url).json(draft).send().await?;
        decode(response).await
    }

    async fn update_activity(&self, id: &ActivityId, draft: &ActivityDraft) -> ApiResult<Activity> {
        let url = self.activity_url(id);
        tracing::debug!(%url, "PUT activity");

        let response = self.client.put(&url).json(draft).send().await?;
        decode(response).await
    }

    async fn delete_activity(&self, id: &ActivityId) -> ApiResult<DeleteAck> {
        let url = self.activity_url(id);
        tracing::debug!(%url, "DELETE activity");

        let response = self.client.delete(&url).send().await?;
        decode(response).await
    }

    async fn send_chat_message(&self, message: &str) -> ApiResult<ChatReply> {
        let url = self.url("/api/chat");
        tracing::debug!(%url, chars = message.chars().count(), "POST chat");

        let body = ChatRequest {
            message: message.to_string(),
        };
        let response = self.client.post(&url).json(&body).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = ApiClient::new(ApiConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(client.url("/api/chat"), "http://localhost:8000/api/chat");
        assert_eq!(
            client.activity_url(&ActivityId::Int(3)),
            "http://localhost:8000/api/activities/3"
        );
        assert_eq!(
            client.activity_url(&ActivityId::Text("a b/c".to_string())),
            "http://localhost:8000/api/activities/a%20b%2Fc"
        );
    }

    #[test]
    fn test_parse_activities_skips_bad_rows() {
        let rows = vec![
            serde_json::json!({"id": 1, "title": "Gym", "date": "2024-06-10", "time": "07:00"}),
            serde_json::json!({"id": 2, "title": "Trip", "date": "next friday"}),
            serde_json::json!({"id": 3, "date": "2024-06-11"}),
            serde_json::json!({"id": 4, "title": "Read", "date": "2024-06-11"}),
        ];
        let ids: Vec<ActivityId> = parse_activities(rows).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![ActivityId::Int(1), ActivityId::Int(4)]);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        // Port 9 (discard) is essentially never listening locally
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.get_activities().await.unwrap_err();
        assert!(err.status().is_none());
    }
}
