pub mod cloud_recording;
pub mod request_translator;
pub mod token;
pub mod uid_generator;
