use crate::{
    application::usecases::{
        cloud_recording::CloudRecordingUseCase, request_translator::RequestTranslator,
        token::TokenUseCase,
    },
    config::config_model::{Cors, DotEnvyConfig},
    domain::repositories::{cloud_recording_gateway::CloudRecordingGateway, token_issuer::TokenIssuer},
    infrastructure::axum_http::{default_routers, error_responses::ErrorResponse, routers},
};
use anyhow::Result;
use axum::{
    Router,
    extract::{Request, State},
    http::{
        HeaderValue, Method, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, ORIGIN, PRAGMA},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

/// Wires use cases onto their routes and applies the router-wide layers.
pub fn router<G, T>(config: &DotEnvyConfig, gateway: Arc<G>, token_issuer: Arc<T>) -> Result<Router>
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    let cloud_recording_usecase = CloudRecordingUseCase::new(
        gateway,
        Arc::clone(&token_issuer),
        RequestTranslator::new(config.storage.clone()),
        config.token.expire_seconds,
    );
    let token_usecase = TokenUseCase::new(token_issuer, config.token.expire_seconds);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/cloud_recording",
            routers::cloud_recording::routes(Arc::new(cloud_recording_usecase)),
        )
        .nest("/token", routers::token::routes(Arc::new(token_usecase)))
        .route("/ping", get(default_routers::ping))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("private, no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            EXPIRES,
            HeaderValue::from_static("-1"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(cors_layer(&config.cors)?);

    let app = match allowed_origins(&config.cors)? {
        Some(origins) => app.layer(middleware::from_fn_with_state(
            Arc::new(origins),
            reject_disallowed_origin,
        )),
        None => app,
    };

    Ok(app.layer(TraceLayer::new_for_http()))
}

pub async fn start<G, T>(config: Arc<DotEnvyConfig>, gateway: Arc<G>, token_issuer: Arc<T>) -> Result<()>
where
    G: CloudRecordingGateway + 'static,
    T: TokenIssuer + 'static,
{
    let app = router(&config, gateway, token_issuer)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(cors: &Cors) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ORIGIN, CONTENT_TYPE]);

    match allowed_origins(cors)? {
        Some(origins) => Ok(layer.allow_origin(AllowOrigin::list(origins))),
        None => Ok(layer.allow_origin(Any)),
    }
}

/// `None` means every origin is allowed (`*`).
fn allowed_origins(cors: &Cors) -> Result<Option<Vec<HeaderValue>>> {
    if cors.allow_origin.trim() == "*" {
        return Ok(None);
    }

    let origins = cors
        .allow_origin
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(origins))
}

/// Requests carrying an `Origin` outside the configured list are answered with
/// 403 before any handler runs. Requests without an `Origin` header pass.
async fn reject_disallowed_origin(
    State(allowed): State<Arc<Vec<HeaderValue>>>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(ORIGIN) {
        Some(origin) if !allowed.contains(origin) => {
            warn!(
                origin = ?origin,
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request from disallowed origin"
            );
            ErrorResponse::new(StatusCode::FORBIDDEN, "Origin not allowed".to_string())
                .into_response()
        }
        _ => next.run(request).await,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
