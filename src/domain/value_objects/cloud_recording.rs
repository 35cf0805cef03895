use serde::{Deserialize, Serialize};

/// Minimal start request accepted from callers. The channel and recording mode
/// default to empty strings and the mode stays a raw string, so a missing or
/// unknown value is rejected by validation instead of by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStartRecordingRequest {
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub scene_mode: Option<u8>,
    #[serde(default)]
    pub recording_mode: String,
    #[serde(default)]
    pub exclude_resource_ids: Option<Vec<String>>,
    #[serde(default)]
    pub recording_config: Option<ClientRecordingConfig>,
    #[serde(default)]
    pub transcoding_config: Option<ClientTranscodingConfig>,
    #[serde(default)]
    pub web_recording_config: Option<ClientWebRecordingConfig>,
    #[serde(default)]
    pub recording_file_config: Option<ClientRecordingFileConfig>,
    #[serde(default)]
    pub snapshot_config: Option<ClientSnapshotConfig>,
    #[serde(default)]
    pub storage_file_name_prefix: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecordingConfig {
    pub channel_type: Option<u8>,
    pub stream_types: Option<u8>,
    pub stream_mode: Option<String>,
    pub max_idle_time: Option<u32>,
    pub audio_profile: Option<u8>,
    pub video_stream_type: Option<u8>,
    pub subscribe_audio_uids: Option<Vec<String>>,
    pub unsubscribe_audio_uids: Option<Vec<String>>,
    pub subscribe_video_uids: Option<Vec<String>>,
    pub unsubscribe_video_uids: Option<Vec<String>>,
    pub subscribe_uid_group: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTranscodingConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub bitrate: Option<u32>,
    pub mixed_video_layout: Option<u8>,
    pub max_resolution_uid: Option<String>,
    pub background_color: Option<String>,
    pub layout_config: Option<Vec<ClientLayoutRegion>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientLayoutRegion {
    pub uid: Option<String>,
    pub x_axis: f32,
    pub y_axis: f32,
    pub width: f32,
    pub height: f32,
    pub alpha: Option<f32>,
    pub render_mode: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWebRecordingConfig {
    pub url: String,
    pub audio_profile: Option<u8>,
    pub video_width: Option<u32>,
    pub video_height: Option<u32>,
    pub video_fps: Option<u32>,
    pub video_bitrate: Option<u32>,
    pub max_recording_hour: Option<u32>,
    pub mobile: Option<bool>,
    #[serde(alias = "onhold")]
    pub on_hold: Option<bool>,
    pub ready_timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecordingFileConfig {
    pub av_file_type: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshotConfig {
    pub capture_interval: Option<u32>,
    pub file_type: Vec<String>,
}

/// Everything a caller needs to address the session later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingResponse {
    #[serde(rename = "UID")]
    pub uid: String,
    pub resource_id: String,
    pub recording_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecordingRequest {
    pub cname: String,
    #[serde(rename = "UID", alias = "uid")]
    pub uid: String,
    pub recording_id: String,
    pub resource_id: String,
    pub recording_mode: String,
    #[serde(rename = "async_stop", default)]
    pub async_stop: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStatusQuery {
    pub resource_id: String,
    #[serde(alias = "sid")]
    pub recording_id: String,
    #[serde(alias = "mode")]
    pub recording_mode: String,
}

/// Subscriber-list and layout updates. `client_request` is provider-shaped and
/// forwarded untouched because update accepts the same schema as start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordingRequest {
    pub cname: String,
    #[serde(alias = "UID")]
    pub uid: String,
    pub resource_id: String,
    #[serde(alias = "sid")]
    pub recording_id: String,
    #[serde(default)]
    pub recording_mode: Option<String>,
    pub client_request: serde_json::Value,
}
