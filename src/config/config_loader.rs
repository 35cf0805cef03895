use anyhow::{Context, Result, bail};
use url::Url;

use super::config_model::{
    AppCredentials, Cors, CustomerCredentials, DotEnvyConfig, Provider, Server, Storage,
    TokenSettings,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BODY_LIMIT_MB: u64 = 10;
const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 90;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOKEN_EXPIRE_SECS: u32 = 3600;
const DEFAULT_BASE_URL: &str = "https://api.agora.io/v1/apps";

/// Reads the process environment. `.env` is loaded once by `main` beforehand.
pub fn load() -> Result<DotEnvyConfig> {
    load_from(|key| std::env::var(key).ok())
}

/// Builds the configuration from any key lookup so it can be exercised without
/// touching the process environment.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let required = |key: &str| var(key).with_context(|| format!("{} is invalid", key));

    let port = match var("SERVER_PORT").or_else(|| var("PORT")) {
        Some(raw) => raw.parse().context("SERVER_PORT is invalid")?,
        None => DEFAULT_PORT,
    };

    let server = Server {
        port,
        body_limit: parse_or(var("SERVER_BODY_LIMIT"), DEFAULT_BODY_LIMIT_MB, "SERVER_BODY_LIMIT")?,
        timeout: parse_or(var("SERVER_TIMEOUT"), DEFAULT_SERVER_TIMEOUT_SECS, "SERVER_TIMEOUT")?,
    };

    let app = AppCredentials {
        app_id: required("APP_ID")?,
        app_certificate: required("APP_CERTIFICATE")?,
    };

    let customer = CustomerCredentials {
        customer_id: required("CUSTOMER_ID")?,
        customer_certificate: required("CUSTOMER_CERTIFICATE")?,
    };

    let base_url = var("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let parsed = Url::parse(&base_url).context("BASE_URL is invalid")?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("BASE_URL must use http or https");
    }

    let provider = Provider {
        base_url: base_url.trim_end_matches('/').to_string(),
        timeout: parse_or(
            var("PROVIDER_TIMEOUT"),
            DEFAULT_PROVIDER_TIMEOUT_SECS,
            "PROVIDER_TIMEOUT",
        )?,
    };

    let storage = Storage {
        vendor: required("STORAGE_VENDOR")?
            .parse()
            .context("STORAGE_VENDOR is invalid")?,
        region: required("STORAGE_REGION")?
            .parse()
            .context("STORAGE_REGION is invalid")?,
        bucket: required("STORAGE_BUCKET")?,
        access_key: required("STORAGE_ACCESS_KEY")?,
        secret_key: required("STORAGE_SECRET_KEY")?,
        file_name_prefix: var("STORAGE_FILE_NAME_PREFIX")
            .map(|raw| {
                raw.split('/')
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    let token = TokenSettings {
        expire_seconds: parse_or(
            var("TOKEN_EXPIRE_SECONDS"),
            DEFAULT_TOKEN_EXPIRE_SECS,
            "TOKEN_EXPIRE_SECONDS",
        )?,
    };

    let cors = Cors {
        allow_origin: var("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        app,
        customer,
        provider,
        storage,
        token,
        cors,
    })
}

fn parse_or<T>(raw: Option<String>, default: T, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw.parse().with_context(|| format!("{} is invalid", key)),
        None => Ok(default),
    }
}
