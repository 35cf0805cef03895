use chrono::Utc;
use rand::Rng;

use crate::{
    config::config_model::AppCredentials,
    domain::{
        repositories::token_issuer::{TokenError, TokenIssuer},
        value_objects::enums::token_kinds::{TokenKind, TokenRole},
    },
    infrastructure::token::access_token2::{
        AccessToken2, PRIVILEGE_CHAT_APP, PRIVILEGE_CHAT_USER, PRIVILEGE_JOIN_CHANNEL,
        PRIVILEGE_PUBLISH_AUDIO_STREAM, PRIVILEGE_PUBLISH_DATA_STREAM,
        PRIVILEGE_PUBLISH_VIDEO_STREAM, PRIVILEGE_RTM_LOGIN, Service,
    },
};

const MAX_SALT: u32 = 99_999_999;

/// Signs tokens with the application credentials. These are never the
/// customer credentials used against the REST API.
pub struct AppTokenIssuer {
    app_id: String,
    app_certificate: String,
}

impl AppTokenIssuer {
    pub fn new(app: &AppCredentials) -> Self {
        Self {
            app_id: app.app_id.clone(),
            app_certificate: app.app_certificate.clone(),
        }
    }

    fn issue_at(
        &self,
        kind: TokenKind,
        channel: &str,
        uid: &str,
        role: TokenRole,
        ttl_seconds: u32,
        issue_ts: u32,
        salt: u32,
    ) -> Result<String, TokenError> {
        let mut token =
            AccessToken2::new(&self.app_id, &self.app_certificate, issue_ts, ttl_seconds, salt);

        let service = match kind {
            TokenKind::Rtc => {
                if channel.is_empty() {
                    return Err(TokenError::InvalidArgument(
                        "channel is required for rtc tokens".to_string(),
                    ));
                }
                let mut rtc = Service::rtc(channel, if uid.is_empty() { "0" } else { uid });
                rtc.add_privilege(PRIVILEGE_JOIN_CHANNEL, ttl_seconds);
                if role == TokenRole::Publisher {
                    rtc.add_privilege(PRIVILEGE_PUBLISH_AUDIO_STREAM, ttl_seconds);
                    rtc.add_privilege(PRIVILEGE_PUBLISH_VIDEO_STREAM, ttl_seconds);
                    rtc.add_privilege(PRIVILEGE_PUBLISH_DATA_STREAM, ttl_seconds);
                }
                rtc
            }
            TokenKind::Rtm => {
                if uid.is_empty() {
                    return Err(TokenError::InvalidArgument(
                        "user id is required for rtm tokens".to_string(),
                    ));
                }
                let mut rtm = Service::rtm(uid);
                rtm.add_privilege(PRIVILEGE_RTM_LOGIN, ttl_seconds);
                rtm
            }
            TokenKind::Chat => {
                let mut chat = Service::chat(uid);
                let privilege = if uid.is_empty() {
                    PRIVILEGE_CHAT_APP
                } else {
                    PRIVILEGE_CHAT_USER
                };
                chat.add_privilege(privilege, ttl_seconds);
                chat
            }
        };

        token.add_service(service);
        token.build()
    }
}

impl TokenIssuer for AppTokenIssuer {
    fn issue_token(
        &self,
        kind: TokenKind,
        channel: &str,
        uid: &str,
        role: TokenRole,
        ttl_seconds: u32,
    ) -> Result<String, TokenError> {
        let issue_ts = u32::try_from(Utc::now().timestamp())
            .map_err(|_| TokenError::Build("system clock out of range".to_string()))?;
        let salt = rand::thread_rng().gen_range(1..=MAX_SALT);

        self.issue_at(kind, channel, uid, role, ttl_seconds, issue_ts, salt)
    }
}
