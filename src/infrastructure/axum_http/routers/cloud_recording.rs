use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use tracing::error;

use crate::{
    application::usecases::cloud_recording::{CloudRecordingUseCase, UseCaseResult},
    domain::{
        repositories::{cloud_recording_gateway::CloudRecordingGateway, token_issuer::TokenIssuer},
        value_objects::cloud_recording::{
            ClientStartRecordingRequest, RecordingStatusQuery, StopRecordingRequest,
            UpdateRecordingRequest,
        },
    },
    infrastructure::axum_http::error_responses::ErrorResponse,
};

pub fn routes<G, T>(cloud_recording_usecase: Arc<CloudRecordingUseCase<G, T>>) -> Router
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    Router::new()
        .route("/startRecording", post(start_recording::<G, T>))
        .route("/stopRecording", post(stop_recording::<G, T>))
        .route("/getStatus", get(get_status::<G, T>))
        .route(
            "/update/subscriber-list",
            post(update_subscription_list::<G, T>),
        )
        .route("/update/layout", post(update_layout::<G, T>))
        .with_state(cloud_recording_usecase)
}

/// The start sequence runs on its own task: dropping this handler on client
/// disconnect or request timeout must not abandon an acquired resource halfway.
pub async fn start_recording<G, T>(
    State(cloud_recording_usecase): State<Arc<CloudRecordingUseCase<G, T>>>,
    Json(request): Json<ClientStartRecordingRequest>,
) -> Response
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    let task =
        tokio::spawn(async move { cloud_recording_usecase.start_recording(request).await });

    match task.await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(err) => {
            error!(error = %err, "start_recording: task aborted");
            ErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "start recording task aborted".to_string(),
            )
            .into_response()
        }
    }
}

pub async fn stop_recording<G, T>(
    State(cloud_recording_usecase): State<Arc<CloudRecordingUseCase<G, T>>>,
    Json(request): Json<StopRecordingRequest>,
) -> Response
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    relay(cloud_recording_usecase.stop_recording(request).await)
}

pub async fn get_status<G, T>(
    State(cloud_recording_usecase): State<Arc<CloudRecordingUseCase<G, T>>>,
    Query(query): Query<RecordingStatusQuery>,
) -> Response
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    relay(cloud_recording_usecase.get_status(query).await)
}

pub async fn update_subscription_list<G, T>(
    State(cloud_recording_usecase): State<Arc<CloudRecordingUseCase<G, T>>>,
    Json(request): Json<UpdateRecordingRequest>,
) -> Response
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    relay(
        cloud_recording_usecase
            .update_subscription_list(request)
            .await,
    )
}

pub async fn update_layout<G, T>(
    State(cloud_recording_usecase): State<Arc<CloudRecordingUseCase<G, T>>>,
    Json(request): Json<UpdateRecordingRequest>,
) -> Response
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    relay(cloud_recording_usecase.update_layout(request).await)
}

/// Provider success bodies go back to the caller byte for byte.
fn relay(result: UseCaseResult<Bytes>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => err.into_response(),
    }
}
