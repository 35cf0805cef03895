use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::application::usecases::{
    cloud_recording::{CloudRecordingError, StartRecordingError},
    token::TokenRequestError,
};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reached: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            code: status.as_u16(),
            message,
            upstream_status: None,
            upstream_body: None,
            resource_id: None,
            reached: None,
        }
    }

    fn from_cloud_recording(err: &CloudRecordingError) -> (StatusCode, Self) {
        let status = err.status_code();
        let message = match err {
            // Signing failures can carry credential details.
            CloudRecordingError::TokenIssuance(_) => "failed to issue channel token".to_string(),
            _ => err.to_string(),
        };

        let body = Self {
            upstream_status: err.upstream_status(),
            upstream_body: err.upstream_body().map(str::to_string),
            ..Self::new(status, message)
        };
        (status, body)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for CloudRecordingError {
    fn into_response(self) -> Response {
        let (status, body) = ErrorResponse::from_cloud_recording(&self);
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for StartRecordingError {
    fn into_response(self) -> Response {
        let (status, mut body) = ErrorResponse::from_cloud_recording(&self.source);
        body.resource_id = self.resource_id;
        body.reached = Some(self.reached.to_string());
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for TokenRequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            TokenRequestError::InvalidRequest(_) => self.to_string(),
            TokenRequestError::Issuance(err) if status == StatusCode::BAD_REQUEST => err.to_string(),
            TokenRequestError::Issuance(_) => "failed to issue token".to_string(),
        };
        ErrorResponse::new(status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::session_statuses::SessionStatus;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_client_error_relays_status_and_body() {
        let response = CloudRecordingError::UpstreamClient {
            status: 404,
            body: r#"{"code":404,"reason":"failed to find worker"}"#.to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_of(response).await;
        assert_eq!(body.upstream_status, Some(404));
        assert_eq!(
            body.upstream_body.as_deref(),
            Some(r#"{"code":404,"reason":"failed to find worker"}"#)
        );
    }

    #[tokio::test]
    async fn start_error_surfaces_orphaned_resource() {
        let response = StartRecordingError {
            reached: SessionStatus::TokenIssued,
            resource_id: Some("res-9".to_string()),
            source: CloudRecordingError::UnknownUpstream {
                status: 500,
                body: "internal".to_string(),
            },
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_of(response).await;
        assert_eq!(body.code, 502);
        assert_eq!(body.resource_id.as_deref(), Some("res-9"));
        assert_eq!(body.reached.as_deref(), Some("token_issued"));
        assert_eq!(body.upstream_status, Some(500));
    }

    #[tokio::test]
    async fn unavailable_maps_to_503_without_upstream_fields() {
        let response =
            CloudRecordingError::UpstreamUnavailable("provider request timed out".to_string())
                .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_of(response).await;
        assert_eq!(body.upstream_status, None);
        assert_eq!(body.upstream_body, None);
    }
}
