use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Rtc,
    Rtm,
    Chat,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token_kind = match self {
            TokenKind::Rtc => "rtc",
            TokenKind::Rtm => "rtm",
            TokenKind::Chat => "chat",
        };
        write!(f, "{}", token_kind)
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rtc" => Ok(TokenKind::Rtc),
            "rtm" => Ok(TokenKind::Rtm),
            "chat" => Ok(TokenKind::Chat),
            other => Err(format!("unsupported token type '{}'", other)),
        }
    }
}

/// Channel role baked into an RTC token.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    #[default]
    Publisher,
    Subscriber,
}

impl Display for TokenRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token_role = match self {
            TokenRole::Publisher => "publisher",
            TokenRole::Subscriber => "subscriber",
        };
        write!(f, "{}", token_role)
    }
}

impl FromStr for TokenRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "publisher" => Ok(TokenRole::Publisher),
            "subscriber" => Ok(TokenRole::Subscriber),
            other => Err(format!("unsupported role '{}'", other)),
        }
    }
}
