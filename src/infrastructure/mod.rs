pub mod axum_http;
pub mod provider;
pub mod token;
