use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    repositories::token_issuer::{TokenError, TokenIssuer},
    value_objects::{
        enums::token_kinds::{TokenKind, TokenRole},
        tokens::{TokenRequest, TokenResponse},
    },
};

#[derive(Debug, Error)]
pub enum TokenRequestError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("token issuance failed: {0}")]
    Issuance(#[from] TokenError),
}

impl TokenRequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenRequestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TokenRequestError::Issuance(TokenError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            TokenRequestError::Issuance(TokenError::Build(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct TokenUseCase<T>
where
    T: TokenIssuer + 'static,
{
    token_issuer: Arc<T>,
    default_ttl_seconds: u32,
}

impl<T> TokenUseCase<T>
where
    T: TokenIssuer + 'static,
{
    pub fn new(token_issuer: Arc<T>, default_ttl_seconds: u32) -> Self {
        Self {
            token_issuer,
            default_ttl_seconds,
        }
    }

    pub fn issue(&self, request: TokenRequest) -> Result<TokenResponse, TokenRequestError> {
        let kind: TokenKind = request
            .token_type
            .parse()
            .map_err(TokenRequestError::InvalidRequest)?;
        let role: TokenRole = request
            .role
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(TokenRequestError::InvalidRequest)?;

        let ttl_seconds = request.expire.unwrap_or(self.default_ttl_seconds);
        if ttl_seconds == 0 {
            return Err(TokenRequestError::InvalidRequest(
                "expire must be greater than zero".to_string(),
            ));
        }

        let channel = request.channel.unwrap_or_default().trim().to_string();
        let uid = request.uid.unwrap_or_default().trim().to_string();

        match kind {
            TokenKind::Rtc if channel.is_empty() => {
                return Err(TokenRequestError::InvalidRequest(
                    "channel is required for rtc tokens".to_string(),
                ));
            }
            TokenKind::Rtm if uid.is_empty() => {
                return Err(TokenRequestError::InvalidRequest(
                    "uid is required for rtm tokens".to_string(),
                ));
            }
            _ => {}
        }

        let token = self
            .token_issuer
            .issue_token(kind, &channel, &uid, role, ttl_seconds)
            .map_err(|err| {
                warn!(%kind, error = %err, "token: issuance failed");
                TokenRequestError::from(err)
            })?;

        info!(%kind, %role, ttl_seconds, "token: issued");
        Ok(TokenResponse { token })
    }
}
