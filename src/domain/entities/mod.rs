pub mod recording_sessions;
