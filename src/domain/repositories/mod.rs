pub mod cloud_recording_gateway;
pub mod token_issuer;
