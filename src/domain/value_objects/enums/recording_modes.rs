use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Recording topology understood by the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordingMode {
    Individual,
    Mix,
    Web,
}

impl RecordingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingMode::Individual => "individual",
            RecordingMode::Mix => "mix",
            RecordingMode::Web => "web",
        }
    }
}

impl Display for RecordingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(RecordingMode::Individual),
            "mix" => Ok(RecordingMode::Mix),
            "web" => Ok(RecordingMode::Web),
            other => Err(format!(
                "invalid recording mode '{}': expected one of individual, mix, web",
                other
            )),
        }
    }
}
