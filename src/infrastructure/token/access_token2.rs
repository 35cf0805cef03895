//! Version "007" access token packer.
//!
//! Layout: `"007" + base64(zlib(pack(signature) + signing_info))` where
//! `signing_info` is the app id, issue time, expiry, salt and the privilege
//! table of every service, all little-endian.

use base64::{Engine, engine::general_purpose::STANDARD};
use flate2::{Compression, write::ZlibEncoder};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::{collections::BTreeMap, io::Write};

use crate::domain::repositories::token_issuer::TokenError;

type HmacSha256 = Hmac<Sha256>;

pub const VERSION: &str = "007";

pub const SERVICE_RTC: u16 = 1;
pub const SERVICE_RTM: u16 = 2;
pub const SERVICE_CHAT: u16 = 5;

pub const PRIVILEGE_JOIN_CHANNEL: u16 = 1;
pub const PRIVILEGE_PUBLISH_AUDIO_STREAM: u16 = 2;
pub const PRIVILEGE_PUBLISH_VIDEO_STREAM: u16 = 3;
pub const PRIVILEGE_PUBLISH_DATA_STREAM: u16 = 4;
pub const PRIVILEGE_RTM_LOGIN: u16 = 1;
pub const PRIVILEGE_CHAT_USER: u16 = 1;
pub const PRIVILEGE_CHAT_APP: u16 = 2;

/// One service section: its type, privileges with relative expiry seconds,
/// and the identity strings packed after the privileges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    service_type: u16,
    privileges: BTreeMap<u16, u32>,
    identity: Vec<String>,
}

impl Service {
    /// A uid of `"0"` means any uid and is packed as an empty string.
    pub fn rtc(channel: &str, uid: &str) -> Self {
        let uid = if uid == "0" { "" } else { uid };
        Self::with_identity(SERVICE_RTC, vec![channel.to_string(), uid.to_string()])
    }

    pub fn rtm(user_id: &str) -> Self {
        Self::with_identity(SERVICE_RTM, vec![user_id.to_string()])
    }

    /// Empty `user_id` builds an app-level chat service.
    pub fn chat(user_id: &str) -> Self {
        Self::with_identity(SERVICE_CHAT, vec![user_id.to_string()])
    }

    fn with_identity(service_type: u16, identity: Vec<String>) -> Self {
        Self {
            service_type,
            privileges: BTreeMap::new(),
            identity,
        }
    }

    pub fn add_privilege(&mut self, privilege: u16, expire: u32) {
        self.privileges.insert(privilege, expire);
    }

    fn pack(&self, out: &mut Vec<u8>) -> Result<(), TokenError> {
        pack_u16(out, self.service_type);
        pack_u16(out, len_u16(self.privileges.len())?);
        for (privilege, expire) in &self.privileges {
            pack_u16(out, *privilege);
            pack_u32(out, *expire);
        }
        for value in &self.identity {
            pack_bytes(out, value.as_bytes())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AccessToken2 {
    app_id: String,
    app_certificate: String,
    issue_ts: u32,
    expire: u32,
    salt: u32,
    services: BTreeMap<u16, Service>,
}

impl AccessToken2 {
    pub fn new(app_id: &str, app_certificate: &str, issue_ts: u32, expire: u32, salt: u32) -> Self {
        Self {
            app_id: app_id.to_string(),
            app_certificate: app_certificate.to_string(),
            issue_ts,
            expire,
            salt,
            services: BTreeMap::new(),
        }
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.insert(service.service_type, service);
    }

    pub fn build(&self) -> Result<String, TokenError> {
        if self.app_id.is_empty() || self.app_certificate.is_empty() {
            return Err(TokenError::InvalidArgument(
                "app id and app certificate are required".to_string(),
            ));
        }
        if self.services.is_empty() {
            return Err(TokenError::InvalidArgument(
                "token carries no service".to_string(),
            ));
        }

        let signing_info = self.signing_info()?;
        let signing_key = hmac_sha256(
            &self.salt.to_le_bytes(),
            &hmac_sha256(&self.issue_ts.to_le_bytes(), self.app_certificate.as_bytes())?,
        )?;
        let signature = hmac_sha256(&signing_key, &signing_info)?;

        let mut content = Vec::with_capacity(signature.len() + signing_info.len() + 2);
        pack_bytes(&mut content, &signature)?;
        content.extend_from_slice(&signing_info);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&content)
            .map_err(|err| TokenError::Build(err.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|err| TokenError::Build(err.to_string()))?;

        Ok(format!("{}{}", VERSION, STANDARD.encode(compressed)))
    }

    fn signing_info(&self) -> Result<Vec<u8>, TokenError> {
        let mut out = Vec::new();
        pack_bytes(&mut out, self.app_id.as_bytes())?;
        pack_u32(&mut out, self.issue_ts);
        pack_u32(&mut out, self.expire);
        pack_u32(&mut out, self.salt);
        pack_u16(&mut out, len_u16(self.services.len())?);
        for service in self.services.values() {
            service.pack(&mut out)?;
        }
        Ok(out)
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|err| TokenError::Build(err.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn len_u16(len: usize) -> Result<u16, TokenError> {
    u16::try_from(len).map_err(|_| TokenError::InvalidArgument("token field too long".to_string()))
}

fn pack_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn pack_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn pack_bytes(out: &mut Vec<u8>, value: &[u8]) -> Result<(), TokenError> {
    pack_u16(out, len_u16(value.len())?);
    out.extend_from_slice(value);
    Ok(())
}
