pub mod cloud_recording;
pub mod token;
