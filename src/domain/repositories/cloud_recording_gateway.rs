use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::value_objects::{
    enums::recording_modes::RecordingMode,
    provider_requests::{ProviderClientRequest, ProviderEnvelope, StopClientRequest},
};

/// Classified failure of a single provider call. Status errors keep the raw
/// upstream body so callers can see why the provider said no.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("provider rejected customer credentials (status {status})")]
    Auth { status: u16, body: String },
    #[error("provider rejected the request (status {status})")]
    Client { status: u16, body: String },
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected provider response (status {status})")]
    Unknown { status: u16, body: String },
}

impl ProviderError {
    /// Maps a non-success status onto an error kind. Only call with `status >= 300`.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ProviderError::Auth { status, body },
            400..=499 => ProviderError::Client { status, body },
            _ => ProviderError::Unknown { status, body },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Auth { status, .. }
            | ProviderError::Client { status, .. }
            | ProviderError::Unknown { status, .. } => Some(*status),
            ProviderError::Unavailable(_) => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ProviderError::Auth { body, .. }
            | ProviderError::Client { body, .. }
            | ProviderError::Unknown { body, .. } => Some(body),
            ProviderError::Unavailable(_) => None,
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Authenticated access to the provider's cloud-recording control plane.
/// Every method performs exactly one HTTP call and returns the raw success body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudRecordingGateway: Send + Sync {
    async fn acquire(
        &self,
        request: ProviderEnvelope<ProviderClientRequest>,
    ) -> ProviderResult<Bytes>;

    async fn start(
        &self,
        resource_id: &str,
        mode: RecordingMode,
        request: ProviderEnvelope<ProviderClientRequest>,
    ) -> ProviderResult<Bytes>;

    async fn stop(
        &self,
        resource_id: &str,
        sid: &str,
        mode: RecordingMode,
        request: ProviderEnvelope<StopClientRequest>,
    ) -> ProviderResult<Bytes>;

    async fn query(&self, resource_id: &str, sid: &str, mode: RecordingMode)
    -> ProviderResult<Bytes>;

    async fn update(
        &self,
        resource_id: &str,
        sid: &str,
        request: ProviderEnvelope<serde_json::Value>,
    ) -> ProviderResult<Bytes>;

    async fn update_layout(
        &self,
        resource_id: &str,
        sid: &str,
        request: ProviderEnvelope<serde_json::Value>,
    ) -> ProviderResult<Bytes>;
}
