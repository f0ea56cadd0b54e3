//! HTTP client for the manager backend

use anyhow::Context;
use async_trait::async_trait;
use dashboard_lib::{
    ActionResponse, ApiError, ConnectStatus, DeleteRequest, ManagerApi, RenameRequest,
    StatsPayload,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

/// API client for the manager backend
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.base_url.join(path)?;
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.base_url.join(path)?;
        tracing::debug!(url = %url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST an action; error statuses carrying an action body are still answers
    async fn post_action<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ActionResponse, ApiError> {
        match self.post::<ActionResponse, B>(path, body).await {
            Err(ApiError::Status { status, body }) => {
                serde_json::from_str(&body).map_err(|_| ApiError::Status { status, body })
            }
            other => other,
        }
    }
}

#[async_trait]
impl ManagerApi for ApiClient {
    async fn connect_check(&self) -> Result<ConnectStatus, ApiError> {
        self.get("manual-connect").await
    }

    async fn delete_client(&self, name: &str) -> Result<ActionResponse, ApiError> {
        let body = DeleteRequest {
            name: name.to_string(),
        };
        self.post_action("delete_client", &body).await
    }

    async fn rename_client(&self, request: &RenameRequest) -> Result<ActionResponse, ApiError> {
        self.post_action("update_client_name", request).await
    }

    async fn fetch_stats(&self, client_name: &str) -> Result<StatsPayload, ApiError> {
        let mut url = self.base_url.join("stats_data")?;
        url.query_pairs_mut().append_pair("client_name", client_name);
        self.get(url.as_str()).await
    }
}
