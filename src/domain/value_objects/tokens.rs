use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub token_type: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub expire: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
}
