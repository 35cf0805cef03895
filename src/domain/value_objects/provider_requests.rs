//! Request and response bodies of the provider's cloud-recording REST API.
//!
//! These mirror the upstream wire schema and are only ever built by the
//! request translator or forwarded verbatim; callers never see them.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SCENE: u8 = 1;
pub const DEFAULT_RESOURCE_EXPIRED_HOUR: u32 = 24;
pub const WEB_RECORDER_SERVICE: &str = "web_recorder_service";

/// `{cname, uid, clientRequest}` wrapper shared by every provider call that has a body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEnvelope<T> {
    pub cname: String,
    pub uid: String,
    pub client_request: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderClientRequest {
    pub scene: u8,
    pub resource_expired_hour: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_resource_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_parameter: Option<StartParameter>,
}

impl ProviderClientRequest {
    /// Acquire only needs the allocation hints; storage credentials stay out of it.
    pub fn for_acquire(&self) -> Self {
        Self {
            scene: self.scene,
            resource_expired_hour: self.resource_expired_hour,
            exclude_resource_ids: self.exclude_resource_ids.clone(),
            start_parameter: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartParameter {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    pub storage_config: StorageConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_config: Option<RecordingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_file_config: Option<RecordingFileConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_config: Option<SnapshotConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_service_config: Option<ExtensionServiceConfig>,
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub vendor: u8,
    pub region: u8,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name_prefix: Option<Vec<String>>,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("vendor", &self.vendor)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("file_name_prefix", &self.file_name_prefix)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordingConfig {
    pub channel_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_types: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_profile: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_stream_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe_audio_uids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribe_audio_uids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe_video_uids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribe_video_uids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe_uid_group: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcoding_config: Option<TranscodingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscodingConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate: u32,
    pub mixed_video_layout: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resolution_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_config: Option<Vec<LayoutConfig>>,
}

/// One region of a custom mixed layout. Coordinates are fractions of the canvas.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub x_axis: f32,
    pub y_axis: f32,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordingFileConfig {
    pub av_file_type: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_interval: Option<u32>,
    pub file_type: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionServiceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_handle_policy: Option<String>,
    pub extension_services: Vec<ExtensionService>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionService {
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_handle_policy: Option<String>,
    pub service_param: ServiceParam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceParam {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_profile: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_recording_hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
    #[serde(rename = "onhold", skip_serializing_if = "Option::is_none")]
    pub on_hold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StopClientRequest {
    pub async_stop: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireResourceResponse {
    pub resource_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingProviderResponse {
    pub sid: String,
    #[serde(default)]
    pub resource_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn acquire_body_omits_start_parameter() {
        let client_request = ProviderClientRequest {
            scene: DEFAULT_SCENE,
            resource_expired_hour: DEFAULT_RESOURCE_EXPIRED_HOUR,
            exclude_resource_ids: None,
            start_parameter: Some(StartParameter::default()),
        };

        let body = serde_json::to_value(ProviderEnvelope {
            cname: "testChannel".to_string(),
            uid: "42".to_string(),
            client_request: client_request.for_acquire(),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "cname": "testChannel",
                "uid": "42",
                "clientRequest": { "scene": 1, "resourceExpiredHour": 24 }
            })
        );
    }

    #[test]
    fn empty_token_is_not_serialized() {
        let body = serde_json::to_value(StartParameter::default()).unwrap();
        assert!(body.get("token").is_none());
        assert!(body.get("storageConfig").is_some());
    }

    #[test]
    fn storage_debug_redacts_credentials() {
        let storage = StorageConfig {
            access_key: "AKIA-visible?".to_string(),
            secret_key: "super-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", storage);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("AKIA-visible?"));
    }

    #[test]
    fn layout_regions_use_snake_case_keys() {
        let region = LayoutConfig {
            uid: Some("7".to_string()),
            x_axis: 0.5,
            y_axis: 0.0,
            width: 0.5,
            height: 1.0,
            alpha: None,
            render_mode: Some(1),
        };
        let body = serde_json::to_value(region).unwrap();
        assert_eq!(body["x_axis"], json!(0.5));
        assert_eq!(body["render_mode"], json!(1));
        assert!(body.get("alpha").is_none());
    }
}
