use crate::domain::model::{
    ContactFormInput, ContactResponse, ContactSubmission, Envelope, StatusCheck,
};
use crate::utils::error::{PortfolioError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Portfolio API 的 HTTP client，給 smoke test 與整合測試使用
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        tracing::debug!("GET {}", self.url("/"));
        let response = self.client.get(self.url("/")).send().await?;
        decode(response).await
    }

    /// 作品集以原始 JSON 回傳，方便檢查欄位是否齊全
    pub async fn portfolio(&self) -> Result<Envelope<serde_json::Value>> {
        let response = self.client.get(self.url("/portfolio")).send().await?;
        decode(response).await
    }

    pub async fn submit_contact(&self, form: &ContactFormInput) -> Result<ContactResponse> {
        tracing::debug!("POST {}", self.url("/contact"));
        let response = self
            .client
            .post(self.url("/contact"))
            .json(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn contacts(&self) -> Result<Envelope<Vec<ContactSubmission>>> {
        let response = self.client.get(self.url("/contacts")).send().await?;
        decode(response).await
    }

    pub async fn create_status_check(&self, client_name: &str) -> Result<StatusCheck> {
        let response = self
            .client
            .post(self.url("/status"))
            .json(&serde_json::json!({ "client_name": client_name }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn status_checks(&self) -> Result<Vec<StatusCheck>> {
        let response = self.client.get(self.url("/status")).send().await?;
        decode(response).await
    }

    /// 送出 CORS preflight，回傳 response headers
    pub async fn preflight(&self, path: &str, origin: &str) -> Result<HeaderMap> {
        let response = self
            .client
            .request(Method::OPTIONS, self.url(path))
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await?;
        Ok(response.headers().clone())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PortfolioError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
