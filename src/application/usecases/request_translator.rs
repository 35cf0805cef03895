//! Turns the minimal caller request into the provider's verbose start schema.
//!
//! Pure: no I/O, no clock, no randomness. The caller's request is only read;
//! every provider block is built fresh from defaults plus copied overrides.

use crate::{
    application::usecases::cloud_recording::CloudRecordingError,
    config::config_model::Storage,
    domain::value_objects::{
        cloud_recording::{
            ClientLayoutRegion, ClientRecordingConfig, ClientStartRecordingRequest,
            ClientTranscodingConfig, ClientWebRecordingConfig,
        },
        enums::recording_modes::RecordingMode,
        provider_requests::{
            DEFAULT_RESOURCE_EXPIRED_HOUR, DEFAULT_SCENE, ExtensionService,
            ExtensionServiceConfig, LayoutConfig, ProviderClientRequest, RecordingConfig,
            RecordingFileConfig, ServiceParam, SnapshotConfig, StartParameter, StorageConfig,
            TranscodingConfig, WEB_RECORDER_SERVICE,
        },
    },
};

const MAX_CHANNEL_NAME_BYTES: usize = 64;
const DEFAULT_CHANNEL_TYPE: u8 = 0;
const DEFAULT_STREAM_TYPES: u8 = 2;
const DEFAULT_MAX_IDLE_TIME: u32 = 120;
const CUSTOM_LAYOUT: u8 = 3;
const MAX_LAYOUT_REGIONS: usize = 17;
const DEFAULT_WEB_MAX_RECORDING_HOUR: u32 = 72;

/// Output of translation: the provider `clientRequest` with an empty token.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedRecording {
    pub channel_name: String,
    pub mode: RecordingMode,
    pub client_request: ProviderClientRequest,
}

#[derive(Debug, Clone)]
pub struct RequestTranslator {
    storage: Storage,
}

impl RequestTranslator {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn translate(
        &self,
        request: &ClientStartRecordingRequest,
    ) -> Result<TranslatedRecording, CloudRecordingError> {
        let mode = parse_mode(&request.recording_mode)?;
        let channel_name = validate_channel_name(&request.channel_name)?;

        let (recording_config, extension_service_config) = match mode {
            RecordingMode::Web => {
                if request.recording_config.is_some() || request.transcoding_config.is_some() {
                    return Err(CloudRecordingError::Validation(
                        "recordingConfig and transcodingConfig are not supported in web mode"
                            .to_string(),
                    ));
                }
                let web = request.web_recording_config.as_ref().ok_or_else(|| {
                    CloudRecordingError::Validation(
                        "webRecordingConfig.url is required in web mode".to_string(),
                    )
                })?;
                (None, Some(web_extension_service(web)?))
            }
            RecordingMode::Individual | RecordingMode::Mix => {
                if request.web_recording_config.is_some() {
                    return Err(CloudRecordingError::Validation(format!(
                        "webRecordingConfig is only supported in web mode, not {}",
                        mode
                    )));
                }
                let recording_config = build_recording_config(
                    mode,
                    request.recording_config.as_ref(),
                    request.transcoding_config.as_ref(),
                )?;
                (Some(recording_config), None)
            }
        };

        let recording_file_config = build_recording_file_config(mode, request)?;
        let snapshot_config = build_snapshot_config(mode, request)?;
        let storage_config = self.storage_config(request.storage_file_name_prefix.as_deref())?;

        let exclude_resource_ids = request
            .exclude_resource_ids
            .as_ref()
            .map(|ids| {
                ids.iter()
                    .map(|id| id.trim())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|ids| !ids.is_empty());

        Ok(TranslatedRecording {
            channel_name,
            mode,
            client_request: ProviderClientRequest {
                scene: request.scene_mode.unwrap_or(DEFAULT_SCENE),
                resource_expired_hour: DEFAULT_RESOURCE_EXPIRED_HOUR,
                exclude_resource_ids,
                start_parameter: Some(StartParameter {
                    token: String::new(),
                    storage_config,
                    recording_config,
                    recording_file_config,
                    snapshot_config,
                    extension_service_config,
                }),
            },
        })
    }

    fn storage_config(
        &self,
        prefix_override: Option<&[String]>,
    ) -> Result<StorageConfig, CloudRecordingError> {
        let prefix = match prefix_override {
            Some(segments) => {
                if let Some(bad) = segments
                    .iter()
                    .find(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()))
                {
                    return Err(CloudRecordingError::Validation(format!(
                        "storage file name prefix segment '{}' must be non-empty and alphanumeric",
                        bad
                    )));
                }
                segments.to_vec()
            }
            None => self.storage.file_name_prefix.clone(),
        };

        Ok(StorageConfig {
            vendor: self.storage.vendor,
            region: self.storage.region,
            bucket: self.storage.bucket.clone(),
            access_key: self.storage.access_key.clone(),
            secret_key: self.storage.secret_key.clone(),
            file_name_prefix: if prefix.is_empty() { None } else { Some(prefix) },
        })
    }
}

pub fn parse_mode(raw: &str) -> Result<RecordingMode, CloudRecordingError> {
    raw.parse::<RecordingMode>()
        .map_err(CloudRecordingError::Validation)
}

fn validate_channel_name(raw: &str) -> Result<String, CloudRecordingError> {
    let channel_name = raw.trim();
    if channel_name.is_empty() {
        return Err(CloudRecordingError::Validation(
            "channelName is required".to_string(),
        ));
    }
    if channel_name.len() > MAX_CHANNEL_NAME_BYTES {
        return Err(CloudRecordingError::Validation(format!(
            "channelName must be at most {} bytes",
            MAX_CHANNEL_NAME_BYTES
        )));
    }
    Ok(channel_name.to_string())
}

fn build_recording_config(
    mode: RecordingMode,
    overrides: Option<&ClientRecordingConfig>,
    transcoding: Option<&ClientTranscodingConfig>,
) -> Result<RecordingConfig, CloudRecordingError> {
    let mut config = RecordingConfig {
        channel_type: DEFAULT_CHANNEL_TYPE,
        stream_types: Some(DEFAULT_STREAM_TYPES),
        max_idle_time: Some(DEFAULT_MAX_IDLE_TIME),
        ..Default::default()
    };

    if let Some(overrides) = overrides {
        if let Some(channel_type) = overrides.channel_type {
            if channel_type > 1 {
                return Err(CloudRecordingError::Validation(
                    "recordingConfig.channelType must be 0 or 1".to_string(),
                ));
            }
            config.channel_type = channel_type;
        }
        if let Some(stream_types) = overrides.stream_types {
            if stream_types > 2 {
                return Err(CloudRecordingError::Validation(
                    "recordingConfig.streamTypes must be 0, 1 or 2".to_string(),
                ));
            }
            config.stream_types = Some(stream_types);
        }
        if overrides.max_idle_time.is_some() {
            config.max_idle_time = overrides.max_idle_time;
        }
        config.stream_mode = overrides.stream_mode.clone();
        config.audio_profile = overrides.audio_profile;
        config.video_stream_type = overrides.video_stream_type;
        config.subscribe_audio_uids = overrides.subscribe_audio_uids.clone();
        config.unsubscribe_audio_uids = overrides.unsubscribe_audio_uids.clone();
        config.subscribe_video_uids = overrides.subscribe_video_uids.clone();
        config.unsubscribe_video_uids = overrides.unsubscribe_video_uids.clone();
        config.subscribe_uid_group = overrides.subscribe_uid_group;
    }

    validate_subscription_lists(&config)?;

    config.transcoding_config = match (mode, transcoding) {
        (RecordingMode::Mix, overrides) => Some(build_transcoding_config(overrides)?),
        (_, Some(_)) => {
            return Err(CloudRecordingError::Validation(format!(
                "transcodingConfig is only supported in mix mode, not {}",
                mode
            )));
        }
        (_, None) => None,
    };

    Ok(config)
}

fn validate_subscription_lists(config: &RecordingConfig) -> Result<(), CloudRecordingError> {
    let pairs = [
        (
            "audio",
            &config.subscribe_audio_uids,
            &config.unsubscribe_audio_uids,
        ),
        (
            "video",
            &config.subscribe_video_uids,
            &config.unsubscribe_video_uids,
        ),
    ];

    for (kind, allow, deny) in pairs {
        if allow.is_some() && deny.is_some() {
            return Err(CloudRecordingError::Validation(format!(
                "subscribe and unsubscribe {} uid lists cannot both be set",
                kind
            )));
        }
    }
    Ok(())
}

fn build_transcoding_config(
    overrides: Option<&ClientTranscodingConfig>,
) -> Result<TranscodingConfig, CloudRecordingError> {
    let mut config = TranscodingConfig {
        width: 640,
        height: 360,
        fps: 15,
        bitrate: 500,
        mixed_video_layout: 1,
        ..Default::default()
    };

    let Some(overrides) = overrides else {
        return Ok(config);
    };

    config.width = overrides.width.unwrap_or(config.width);
    config.height = overrides.height.unwrap_or(config.height);
    config.fps = overrides.fps.unwrap_or(config.fps);
    config.bitrate = overrides.bitrate.unwrap_or(config.bitrate);
    config.max_resolution_uid = overrides.max_resolution_uid.clone();
    config.background_color = overrides.background_color.clone();

    if let Some(color) = config.background_color.as_deref() {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(CloudRecordingError::Validation(format!(
                "transcodingConfig.backgroundColor '{}' must be #RRGGBB",
                color
            )));
        }
    }

    match overrides.layout_config.as_deref() {
        Some(regions) => {
            if overrides
                .mixed_video_layout
                .is_some_and(|layout| layout != CUSTOM_LAYOUT)
            {
                return Err(CloudRecordingError::Validation(
                    "transcodingConfig.layoutConfig requires mixedVideoLayout 3".to_string(),
                ));
            }
            if regions.is_empty() || regions.len() > MAX_LAYOUT_REGIONS {
                return Err(CloudRecordingError::Validation(format!(
                    "transcodingConfig.layoutConfig must contain 1 to {} regions",
                    MAX_LAYOUT_REGIONS
                )));
            }
            config.mixed_video_layout = CUSTOM_LAYOUT;
            config.layout_config = Some(
                regions
                    .iter()
                    .map(translate_region)
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        None => {
            if let Some(layout) = overrides.mixed_video_layout {
                if layout > CUSTOM_LAYOUT {
                    return Err(CloudRecordingError::Validation(
                        "transcodingConfig.mixedVideoLayout must be between 0 and 3".to_string(),
                    ));
                }
                if layout == CUSTOM_LAYOUT {
                    return Err(CloudRecordingError::Validation(
                        "mixedVideoLayout 3 requires transcodingConfig.layoutConfig".to_string(),
                    ));
                }
                config.mixed_video_layout = layout;
            }
        }
    }

    Ok(config)
}

fn translate_region(region: &ClientLayoutRegion) -> Result<LayoutConfig, CloudRecordingError> {
    let fraction = |name: &str, value: f32| {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(CloudRecordingError::Validation(format!(
                "layout region {} must be between 0.0 and 1.0, got {}",
                name, value
            )))
        }
    };

    let alpha = region
        .alpha
        .map(|alpha| fraction("alpha", alpha))
        .transpose()?;

    if let Some(render_mode) = region.render_mode {
        if render_mode > 1 {
            return Err(CloudRecordingError::Validation(
                "layout region render_mode must be 0 or 1".to_string(),
            ));
        }
    }

    Ok(LayoutConfig {
        uid: region.uid.clone(),
        x_axis: fraction("x_axis", region.x_axis)?,
        y_axis: fraction("y_axis", region.y_axis)?,
        width: fraction("width", region.width)?,
        height: fraction("height", region.height)?,
        alpha,
        render_mode: region.render_mode,
    })
}

fn web_extension_service(
    web: &ClientWebRecordingConfig,
) -> Result<ExtensionServiceConfig, CloudRecordingError> {
    let url = web.url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CloudRecordingError::Validation(
            "webRecordingConfig.url must be an http(s) URL".to_string(),
        ));
    }

    Ok(ExtensionServiceConfig {
        error_handle_policy: Some("error_abort".to_string()),
        extension_services: vec![ExtensionService {
            service_name: WEB_RECORDER_SERVICE.to_string(),
            error_handle_policy: Some("error_abort".to_string()),
            service_param: ServiceParam {
                url: url.to_string(),
                audio_profile: Some(web.audio_profile.unwrap_or(0)),
                video_width: Some(web.video_width.unwrap_or(1280)),
                video_height: Some(web.video_height.unwrap_or(720)),
                video_fps: web.video_fps,
                video_bitrate: web.video_bitrate,
                max_recording_hour: Some(
                    web.max_recording_hour
                        .unwrap_or(DEFAULT_WEB_MAX_RECORDING_HOUR),
                ),
                mobile: web.mobile,
                on_hold: web.on_hold,
                ready_timeout: web.ready_timeout,
            },
        }],
    })
}

fn build_recording_file_config(
    mode: RecordingMode,
    request: &ClientStartRecordingRequest,
) -> Result<Option<RecordingFileConfig>, CloudRecordingError> {
    let av_file_type = match request.recording_file_config.as_ref() {
        Some(config) => {
            if config.av_file_type.is_empty() {
                return Err(CloudRecordingError::Validation(
                    "recordingFileConfig.avFileType must not be empty".to_string(),
                ));
            }
            if let Some(bad) = config
                .av_file_type
                .iter()
                .find(|t| !matches!(t.as_str(), "hls" | "mp4"))
            {
                return Err(CloudRecordingError::Validation(format!(
                    "unsupported avFileType '{}'",
                    bad
                )));
            }
            if !config.av_file_type.iter().any(|t| t == "hls") {
                return Err(CloudRecordingError::Validation(
                    "recordingFileConfig.avFileType must include hls".to_string(),
                ));
            }
            config.av_file_type.clone()
        }
        None => match mode {
            RecordingMode::Web => vec!["hls".to_string(), "mp4".to_string()],
            RecordingMode::Individual | RecordingMode::Mix => vec!["hls".to_string()],
        },
    };

    Ok(Some(RecordingFileConfig { av_file_type }))
}

fn build_snapshot_config(
    mode: RecordingMode,
    request: &ClientStartRecordingRequest,
) -> Result<Option<SnapshotConfig>, CloudRecordingError> {
    let Some(snapshot) = request.snapshot_config.as_ref() else {
        return Ok(None);
    };

    if mode != RecordingMode::Individual {
        return Err(CloudRecordingError::Validation(
            "snapshotConfig is only supported in individual mode".to_string(),
        ));
    }
    if let Some(interval) = snapshot.capture_interval {
        if !(5..=3600).contains(&interval) {
            return Err(CloudRecordingError::Validation(
                "snapshotConfig.captureInterval must be between 5 and 3600 seconds".to_string(),
            ));
        }
    }

    let file_type = if snapshot.file_type.is_empty() {
        vec!["jpg".to_string()]
    } else {
        snapshot.file_type.clone()
    };

    Ok(Some(SnapshotConfig {
        capture_interval: snapshot.capture_interval,
        file_type,
    }))
}
