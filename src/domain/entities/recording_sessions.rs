use uuid::Uuid;

use crate::domain::value_objects::enums::{
    recording_modes::RecordingMode, session_statuses::SessionStatus,
};

/// Call-scoped view of one recording session. Never stored: the caller keeps
/// `resource_id` and `recording_id` for later stop/update calls.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    pub session_id: Uuid,
    pub channel_name: String,
    pub mode: RecordingMode,
    pub uid: Option<String>,
    pub resource_id: Option<String>,
    pub recording_id: Option<String>,
    pub status: SessionStatus,
}

impl RecordingSession {
    pub fn new(channel_name: String, mode: RecordingMode) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            channel_name,
            mode,
            uid: None,
            resource_id: None,
            recording_id: None,
            status: SessionStatus::Validated,
        }
    }

    /// Rebuilds a session from the triple a previous start returned.
    pub fn resume(
        channel_name: String,
        mode: RecordingMode,
        uid: String,
        resource_id: String,
        recording_id: String,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            channel_name,
            mode,
            uid: Some(uid),
            resource_id: Some(resource_id),
            recording_id: Some(recording_id),
            status: SessionStatus::Started,
        }
    }

    pub fn assign_uid(&mut self, uid: String) {
        self.uid = Some(uid);
        self.status = SessionStatus::UidAssigned;
    }

    pub fn mark_acquired(&mut self, resource_id: String) {
        self.resource_id = Some(resource_id);
        self.status = SessionStatus::Acquired;
    }

    pub fn mark_token_issued(&mut self) {
        self.status = SessionStatus::TokenIssued;
    }

    pub fn mark_started(&mut self, recording_id: String) {
        self.recording_id = Some(recording_id);
        self.status = SessionStatus::Started;
    }

    pub fn mark_stopped(&mut self) {
        self.status = SessionStatus::Stopped;
    }

    /// Marks the session failed and returns the status it had reached.
    pub fn fail(&mut self) -> SessionStatus {
        let reached = self.status;
        self.status = SessionStatus::Failed;
        reached
    }

    /// Resource allocated upstream that no started recording owns yet.
    pub fn orphaned_resource_id(&self) -> Option<&str> {
        match self.status {
            SessionStatus::Acquired | SessionStatus::TokenIssued => self.resource_id.as_deref(),
            _ => None,
        }
    }
}
