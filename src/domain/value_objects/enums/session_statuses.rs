use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Furthest point a recording session reached inside one request.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Validated,
    UidAssigned,
    Acquired,
    TokenIssued,
    Started,
    Stopped,
    Failed,
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session_status = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Validated => "validated",
            SessionStatus::UidAssigned => "uid_assigned",
            SessionStatus::Acquired => "acquired",
            SessionStatus::TokenIssued => "token_issued",
            SessionStatus::Started => "started",
            SessionStatus::Stopped => "stopped",
            SessionStatus::Failed => "failed",
        };
        write!(f, "{}", session_status)
    }
}
