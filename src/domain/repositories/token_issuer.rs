use thiserror::Error;

use crate::domain::value_objects::enums::token_kinds::{TokenKind, TokenRole};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TokenError {
    #[error("invalid token argument: {0}")]
    InvalidArgument(String),
    #[error("failed to build token: {0}")]
    Build(String),
}

/// Signs short-lived channel access credentials.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue_token(
        &self,
        kind: TokenKind,
        channel: &str,
        uid: &str,
        role: TokenRole,
        ttl_seconds: u32,
    ) -> Result<String, TokenError>;
}
