use std::time::Duration;

use secrecy::Secret;
use serde::Deserialize;

use crate::domain::{business::Business, contact::email::EmailAddress};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub log_level: String,
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub business: BusinessSettings,
    pub rate_limit: RateLimitSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    /// Absent until `RESEND_API_KEY` (or `APP_EMAIL_CLIENT__AUTHORIZATION_TOKEN`) is set.
    pub authorization_token: Option<Secret<String>>,
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<EmailAddress, String> {
        EmailAddress::try_from(self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone)]
pub struct BusinessSettings {
    pub name: String,
    pub contact_email: String,
    pub phone: String,
}

impl BusinessSettings {
    pub fn business(&self) -> Result<Business, String> {
        Ok(Business {
            name: self.name.clone(),
            contact_email: EmailAddress::try_from(self.contact_email.clone())?,
            phone: self.phone.clone(),
        })
    }
}

#[derive(Deserialize, Clone)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_milliseconds: u64,
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_milliseconds)
    }
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment, default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        // Deployments already provision these names.
        .set_override_option(
            "email_client.authorization_token",
            std::env::var("RESEND_API_KEY").ok().filter(|v| !v.is_empty()),
        )?
        .set_override_option(
            "email_client.sender_email",
            std::env::var("FROM_EMAIL").ok().filter(|v| !v.is_empty()),
        )?
        .set_override_option(
            "business.contact_email",
            std::env::var("CONTACT_EMAIL").ok().filter(|v| !v.is_empty()),
        )?
        .build()?;

    settings.try_deserialize::<Settings>()
}
