pub mod access_token2;
pub mod app_token_issuer;
