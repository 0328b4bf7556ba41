use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sso_core::KeySources;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub signing: SigningSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Key material and SSO endpoint for token issuance. The three optional
/// key fields form the resolution chain; none is required at startup
/// since keys are resolved per request.
#[derive(serde::Deserialize, Clone)]
pub struct SigningSettings {
    pub private_key: Option<Secret<String>>,
    pub private_key_base64: Option<Secret<String>>,
    pub private_key_file: Option<PathBuf>,
    pub sso_base_url: String,
    /// Platform API key; not involved in signing, surfaced by the debug
    /// route only.
    pub api_key: Option<Secret<String>>,
}

#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub provider_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl KeySources for SigningSettings {
    fn direct_pem(&self) -> Option<String> {
        self.private_key
            .as_ref()
            .map(|s| s.expose_secret().to_owned())
    }

    fn base64_pem(&self) -> Option<String> {
        self.private_key_base64
            .as_ref()
            .map(|s| s.expose_secret().to_owned())
    }

    fn key_file_path(&self) -> Option<PathBuf> {
        self.private_key_file.clone()
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let base_path = Path::new(manifest_dir);
    let configuration_directory = base_path.join("configuration");

    let environment: Enviroment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");
    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and
        // '__' as separator)
        // E.g. `APP_SIGNING__PRIVATE_KEY=...` would set `Settings.signing.private_key`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

pub enum Enviroment {
    Local,
    Production,
}

impl Enviroment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Enviroment::Local => "local",
            Enviroment::Production => "production",
        }
    }
}

impl TryFrom<String> for Enviroment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
            Use either `local` or `production`.",
                other
            )),
        }
    }
}
