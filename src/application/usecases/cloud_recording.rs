use axum::http::StatusCode;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    application::usecases::{
        request_translator::{RequestTranslator, parse_mode},
        uid_generator,
    },
    domain::{
        entities::recording_sessions::RecordingSession,
        repositories::{
            cloud_recording_gateway::{CloudRecordingGateway, ProviderError},
            token_issuer::{TokenError, TokenIssuer},
        },
        value_objects::{
            cloud_recording::{
                ClientStartRecordingRequest, RecordingStatusQuery, StartRecordingResponse,
                StopRecordingRequest, UpdateRecordingRequest,
            },
            enums::{
                session_statuses::SessionStatus,
                token_kinds::{TokenKind, TokenRole},
            },
            provider_requests::{
                AcquireResourceResponse, ProviderEnvelope, StartRecordingProviderResponse,
                StopClientRequest,
            },
        },
    },
};

#[derive(Debug, Error)]
pub enum CloudRecordingError {
    #[error("{0}")]
    Validation(String),
    #[error("provider rejected customer credentials (status {status})")]
    UpstreamAuth { status: u16, body: String },
    #[error("provider rejected the request (status {status})")]
    UpstreamClient { status: u16, body: String },
    #[error("provider unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("unexpected provider response (status {status})")]
    UnknownUpstream { status: u16, body: String },
    #[error("token issuance failed: {0}")]
    TokenIssuance(#[from] TokenError),
}

impl From<ProviderError> for CloudRecordingError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Auth { status, body } => CloudRecordingError::UpstreamAuth { status, body },
            ProviderError::Client { status, body } => {
                CloudRecordingError::UpstreamClient { status, body }
            }
            ProviderError::Unavailable(reason) => CloudRecordingError::UpstreamUnavailable(reason),
            ProviderError::Unknown { status, body } => {
                CloudRecordingError::UnknownUpstream { status, body }
            }
        }
    }
}

impl CloudRecordingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CloudRecordingError::Validation(_) => StatusCode::BAD_REQUEST,
            CloudRecordingError::UpstreamClient { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            CloudRecordingError::UpstreamAuth { .. }
            | CloudRecordingError::UnknownUpstream { .. } => StatusCode::BAD_GATEWAY,
            CloudRecordingError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CloudRecordingError::TokenIssuance(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CloudRecordingError::UpstreamAuth { status, .. }
            | CloudRecordingError::UpstreamClient { status, .. }
            | CloudRecordingError::UnknownUpstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            CloudRecordingError::UpstreamAuth { body, .. }
            | CloudRecordingError::UpstreamClient { body, .. }
            | CloudRecordingError::UnknownUpstream { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Terminal failure of the composite start. `resource_id` is set when a
/// resource was acquired but no recording owns it; it is not released here and
/// expires under the provider's `resourceExpiredHour` unless the caller stops it.
#[derive(Debug, Error)]
#[error("start recording failed at {reached}: {source}")]
pub struct StartRecordingError {
    pub reached: SessionStatus,
    pub resource_id: Option<String>,
    pub source: CloudRecordingError,
}

impl StartRecordingError {
    fn at(session: &mut RecordingSession, source: CloudRecordingError) -> Self {
        let resource_id = session.orphaned_resource_id().map(str::to_string);
        Self {
            reached: session.fail(),
            resource_id,
            source,
        }
    }

    fn before_session(source: CloudRecordingError) -> Self {
        Self {
            reached: SessionStatus::Idle,
            resource_id: None,
            source,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CloudRecordingError>;

/// Sequences acquire, token issuance and start for new recordings and forwards
/// stop/query/update calls. Keeps no state between requests.
pub struct CloudRecordingUseCase<G, T>
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    gateway: Arc<G>,
    token_issuer: Arc<T>,
    translator: RequestTranslator,
    token_ttl_seconds: u32,
}

impl<G, T> CloudRecordingUseCase<G, T>
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        token_issuer: Arc<T>,
        translator: RequestTranslator,
        token_ttl_seconds: u32,
    ) -> Self {
        Self {
            gateway,
            token_issuer,
            translator,
            token_ttl_seconds,
        }
    }

    pub async fn start_recording(
        &self,
        request: ClientStartRecordingRequest,
    ) -> Result<StartRecordingResponse, StartRecordingError> {
        let translated = self.translator.translate(&request).map_err(|err| {
            warn!(
                channel = %request.channel_name,
                recording_mode = %request.recording_mode,
                error = %err,
                "cloud_recording: start request failed validation"
            );
            StartRecordingError::before_session(err)
        })?;

        let mut session = RecordingSession::new(translated.channel_name.clone(), translated.mode);
        let uid = uid_generator::new_uid();
        session.assign_uid(uid.clone());

        info!(
            session_id = %session.session_id,
            channel = %session.channel_name,
            mode = %session.mode,
            %uid,
            "cloud_recording: acquiring resource"
        );

        let acquire_body = self
            .gateway
            .acquire(ProviderEnvelope {
                cname: session.channel_name.clone(),
                uid: uid.clone(),
                client_request: translated.client_request.for_acquire(),
            })
            .await
            .map_err(|err| {
                error!(
                    session_id = %session.session_id,
                    channel = %session.channel_name,
                    error = %err,
                    upstream_body = ?err.body(),
                    "cloud_recording: acquire failed"
                );
                StartRecordingError::at(&mut session, err.into())
            })?;

        let resource_id = parse_acquire_response(&acquire_body)
            .map_err(|err| StartRecordingError::at(&mut session, err))?;
        session.mark_acquired(resource_id.clone());
        debug!(
            session_id = %session.session_id,
            %resource_id,
            "cloud_recording: resource acquired"
        );

        let token = self
            .token_issuer
            .issue_token(
                TokenKind::Rtc,
                &session.channel_name,
                &uid,
                TokenRole::Publisher,
                self.token_ttl_seconds,
            )
            .map_err(|err| {
                warn!(
                    session_id = %session.session_id,
                    channel = %session.channel_name,
                    %resource_id,
                    resource_expired_hour = translated.client_request.resource_expired_hour,
                    error = %err,
                    "cloud_recording: token issuance failed, acquired resource left to expire"
                );
                StartRecordingError::at(&mut session, err.into())
            })?;
        session.mark_token_issued();

        let mut client_request = translated.client_request;
        if let Some(start_parameter) = client_request.start_parameter.as_mut() {
            start_parameter.token = token;
        }
        let resource_expired_hour = client_request.resource_expired_hour;

        info!(
            session_id = %session.session_id,
            channel = %session.channel_name,
            %resource_id,
            mode = %session.mode,
            "cloud_recording: starting recording"
        );

        let start_body = self
            .gateway
            .start(
                &resource_id,
                session.mode,
                ProviderEnvelope {
                    cname: session.channel_name.clone(),
                    uid: uid.clone(),
                    client_request,
                },
            )
            .await
            .map_err(|err| {
                warn!(
                    session_id = %session.session_id,
                    channel = %session.channel_name,
                    %resource_id,
                    resource_expired_hour,
                    error = %err,
                    upstream_body = ?err.body(),
                    "cloud_recording: start failed, acquired resource left to expire"
                );
                StartRecordingError::at(&mut session, err.into())
            })?;

        let sid = parse_start_response(&start_body).map_err(|err| {
            warn!(
                session_id = %session.session_id,
                %resource_id,
                resource_expired_hour,
                "cloud_recording: start response carried no sid, acquired resource left to expire"
            );
            StartRecordingError::at(&mut session, err)
        })?;
        session.mark_started(sid.clone());

        info!(
            session_id = %session.session_id,
            channel = %session.channel_name,
            %uid,
            %resource_id,
            %sid,
            "cloud_recording: recording started"
        );

        Ok(StartRecordingResponse {
            uid,
            resource_id,
            recording_id: sid,
        })
    }

    pub async fn stop_recording(&self, request: StopRecordingRequest) -> UseCaseResult<Bytes> {
        let mode = parse_mode(&request.recording_mode)?;
        require("cname", &request.cname)?;
        require("UID", &request.uid)?;
        require("resourceId", &request.resource_id)?;
        require("recordingId", &request.recording_id)?;

        let mut session = RecordingSession::resume(
            request.cname.clone(),
            mode,
            request.uid.clone(),
            request.resource_id.clone(),
            request.recording_id.clone(),
        );

        info!(
            session_id = %session.session_id,
            channel = %request.cname,
            resource_id = %request.resource_id,
            sid = %request.recording_id,
            %mode,
            async_stop = request.async_stop,
            "cloud_recording: stopping recording"
        );

        let body = self
            .gateway
            .stop(
                &request.resource_id,
                &request.recording_id,
                mode,
                ProviderEnvelope {
                    cname: request.cname.clone(),
                    uid: request.uid.clone(),
                    client_request: StopClientRequest {
                        async_stop: request.async_stop,
                    },
                },
            )
            .await
            .map_err(|err| {
                log_passthrough_failure("stop", &request.resource_id, &request.recording_id, &err);
                CloudRecordingError::from(err)
            })?;

        session.mark_stopped();
        info!(
            session_id = %session.session_id,
            status = %session.status,
            "cloud_recording: recording stopped"
        );
        Ok(body)
    }

    pub async fn get_status(&self, query: RecordingStatusQuery) -> UseCaseResult<Bytes> {
        let mode = parse_mode(&query.recording_mode)?;
        require("resourceId", &query.resource_id)?;
        require("recordingId", &query.recording_id)?;

        debug!(
            resource_id = %query.resource_id,
            sid = %query.recording_id,
            %mode,
            "cloud_recording: querying recording status"
        );

        self.gateway
            .query(&query.resource_id, &query.recording_id, mode)
            .await
            .map_err(|err| {
                log_passthrough_failure("query", &query.resource_id, &query.recording_id, &err);
                CloudRecordingError::from(err)
            })
    }

    pub async fn update_subscription_list(
        &self,
        request: UpdateRecordingRequest,
    ) -> UseCaseResult<Bytes> {
        let (resource_id, sid, envelope) = update_envelope(request)?;
        info!(%resource_id, %sid, "cloud_recording: updating subscription list");

        self.gateway
            .update(&resource_id, &sid, envelope)
            .await
            .map_err(|err| {
                log_passthrough_failure("update", &resource_id, &sid, &err);
                CloudRecordingError::from(err)
            })
    }

    pub async fn update_layout(&self, request: UpdateRecordingRequest) -> UseCaseResult<Bytes> {
        let (resource_id, sid, envelope) = update_envelope(request)?;
        info!(%resource_id, %sid, "cloud_recording: updating layout");

        self.gateway
            .update_layout(&resource_id, &sid, envelope)
            .await
            .map_err(|err| {
                log_passthrough_failure("updateLayout", &resource_id, &sid, &err);
                CloudRecordingError::from(err)
            })
    }
}

fn require(field: &str, value: &str) -> UseCaseResult<()> {
    if value.trim().is_empty() {
        return Err(CloudRecordingError::Validation(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}

fn update_envelope(
    request: UpdateRecordingRequest,
) -> UseCaseResult<(String, String, ProviderEnvelope<serde_json::Value>)> {
    if let Some(mode) = request.recording_mode.as_deref() {
        parse_mode(mode)?;
    }
    require("cname", &request.cname)?;
    require("uid", &request.uid)?;
    require("resourceId", &request.resource_id)?;
    require("recordingId", &request.recording_id)?;
    if !request.client_request.is_object() {
        return Err(CloudRecordingError::Validation(
            "clientRequest must be a JSON object".to_string(),
        ));
    }

    Ok((
        request.resource_id,
        request.recording_id,
        ProviderEnvelope {
            cname: request.cname,
            uid: request.uid,
            client_request: request.client_request,
        },
    ))
}

fn parse_acquire_response(body: &Bytes) -> UseCaseResult<String> {
    serde_json::from_slice::<AcquireResourceResponse>(body)
        .ok()
        .map(|response| response.resource_id)
        .filter(|resource_id| !resource_id.is_empty())
        .ok_or_else(|| CloudRecordingError::UnknownUpstream {
            status: StatusCode::OK.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        })
}

fn parse_start_response(body: &Bytes) -> UseCaseResult<String> {
    serde_json::from_slice::<StartRecordingProviderResponse>(body)
        .ok()
        .map(|response| response.sid)
        .filter(|sid| !sid.is_empty())
        .ok_or_else(|| CloudRecordingError::UnknownUpstream {
            status: StatusCode::OK.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        })
}

fn log_passthrough_failure(operation: &str, resource_id: &str, sid: &str, err: &ProviderError) {
    error!(
        operation,
        resource_id,
        sid,
        error = %err,
        upstream_status = ?err.status(),
        upstream_body = ?err.body(),
        "cloud_recording: provider call failed"
    );
}
