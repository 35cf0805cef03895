pub mod recording_modes;
pub mod session_statuses;
pub mod token_kinds;
