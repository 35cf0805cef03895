pub mod cloud_recording_client;
