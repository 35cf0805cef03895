use anyhow::Result;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use reqwest::{
    Client, Method,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::{
    config::config_model::{AppCredentials, CustomerCredentials, Provider},
    domain::{
        repositories::cloud_recording_gateway::{
            CloudRecordingGateway, ProviderError, ProviderResult,
        },
        value_objects::{
            enums::recording_modes::RecordingMode,
            provider_requests::{ProviderClientRequest, ProviderEnvelope, StopClientRequest},
        },
    },
};

/// Cloud recording REST client. One instance is shared by every request so the
/// connection pool is reused.
pub struct CloudRecordingClient {
    http: Client,
    base_url: String,
    app_id: String,
    authorization: HeaderValue,
}

impl CloudRecordingClient {
    pub fn new(
        provider: &Provider,
        app: &AppCredentials,
        customer: &CustomerCredentials,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(provider.timeout))
            .build()?;

        Ok(Self {
            http,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            app_id: app.app_id.clone(),
            authorization: basic_authorization(customer)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/cloud_recording/{}", self.base_url, self.app_id, path)
    }

    async fn call<B>(&self, method: Method, path: String, body: Option<&B>) -> ProviderResult<Bytes>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut request = self
            .http
            .request(method.clone(), self.url(&path))
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            let err = sanitize_reqwest_error(err);
            error!(%method, %path, error = %err, "cloud_recording_client: request failed");
            err
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(sanitize_reqwest_error)?;

        if status.is_success() {
            debug!(%method, %path, status = status.as_u16(), "cloud_recording_client: ok");
            return Ok(body);
        }

        let body = String::from_utf8_lossy(&body).into_owned();
        error!(
            %method,
            %path,
            status = status.as_u16(),
            response_body = %body,
            "cloud_recording_client: provider returned non-success status"
        );
        Err(ProviderError::from_status(status.as_u16(), body))
    }
}

#[async_trait]
impl CloudRecordingGateway for CloudRecordingClient {
    async fn acquire(
        &self,
        request: ProviderEnvelope<ProviderClientRequest>,
    ) -> ProviderResult<Bytes> {
        self.call(Method::POST, "acquire".to_string(), Some(&request))
            .await
    }

    async fn start(
        &self,
        resource_id: &str,
        mode: RecordingMode,
        request: ProviderEnvelope<ProviderClientRequest>,
    ) -> ProviderResult<Bytes> {
        let path = format!("resourceid/{}/mode/{}/start", resource_id, mode);
        self.call(Method::POST, path, Some(&request)).await
    }

    async fn stop(
        &self,
        resource_id: &str,
        sid: &str,
        mode: RecordingMode,
        request: ProviderEnvelope<StopClientRequest>,
    ) -> ProviderResult<Bytes> {
        let path = format!("resourceid/{}/sid/{}/mode/{}/stop", resource_id, sid, mode);
        self.call(Method::POST, path, Some(&request)).await
    }

    async fn query(
        &self,
        resource_id: &str,
        sid: &str,
        mode: RecordingMode,
    ) -> ProviderResult<Bytes> {
        let path = format!("resourceid/{}/sid/{}/mode/{}/query", resource_id, sid, mode);
        self.call::<()>(Method::GET, path, None).await
    }

    async fn update(
        &self,
        resource_id: &str,
        sid: &str,
        request: ProviderEnvelope<serde_json::Value>,
    ) -> ProviderResult<Bytes> {
        let path = format!("resourceid/{}/sid/{}/update", resource_id, sid);
        self.call(Method::POST, path, Some(&request)).await
    }

    async fn update_layout(
        &self,
        resource_id: &str,
        sid: &str,
        request: ProviderEnvelope<serde_json::Value>,
    ) -> ProviderResult<Bytes> {
        let path = format!("resourceid/{}/sid/{}/updateLayout", resource_id, sid);
        self.call(Method::POST, path, Some(&request)).await
    }
}

fn basic_authorization(customer: &CustomerCredentials) -> Result<HeaderValue> {
    let credentials = STANDARD.encode(format!(
        "{}:{}",
        customer.customer_id, customer.customer_certificate
    ));
    let mut value = HeaderValue::from_str(&format!("Basic {}", credentials))?;
    value.set_sensitive(true);
    Ok(value)
}

fn sanitize_reqwest_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::Unavailable("provider request timed out".to_string());
    }
    if error.is_connect() {
        return ProviderError::Unavailable("provider connection failed".to_string());
    }
    ProviderError::Unavailable("provider request failed".to_string())
}
