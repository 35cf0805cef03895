use std::fmt;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub app: AppCredentials,
    pub customer: CustomerCredentials,
    pub provider: Provider,
    pub storage: Storage,
    pub token: TokenSettings,
    pub cors: Cors,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

/// Application credentials. Used only to sign channel access tokens.
#[derive(Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_certificate: String,
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"<redacted>")
            .finish()
    }
}

/// Customer credentials. Used only for Basic auth against the provider REST API.
#[derive(Clone)]
pub struct CustomerCredentials {
    pub customer_id: String,
    pub customer_certificate: String,
}

impl fmt::Debug for CustomerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerCredentials")
            .field("customer_id", &self.customer_id)
            .field("customer_certificate", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Provider {
    pub base_url: String,
    pub timeout: u64,
}

#[derive(Clone)]
pub struct Storage {
    pub vendor: u8,
    pub region: u8,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub file_name_prefix: Vec<String>,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("vendor", &self.vendor)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("file_name_prefix", &self.file_name_prefix)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub expire_seconds: u32,
}

#[derive(Debug, Clone)]
pub struct Cors {
    /// `*` or a comma-separated list of exact origins.
    pub allow_origin: String,
}
