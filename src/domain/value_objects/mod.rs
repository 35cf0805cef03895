pub mod cloud_recording;
pub mod enums;
pub mod provider_requests;
pub mod tokens;
