use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub captcha: CaptchaSettings,
    pub email: EmailSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: AllowedOrigins,
}

/// Origins permitted to submit the contact form. An empty list disables the
/// origin check altogether.
#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn is_enforced(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn allows(&self, origin: Option<&str>) -> bool {
        match origin {
            Some(origin) => self.0.iter().any(|allowed| allowed == origin),
            None => false,
        }
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct CaptchaSettings {
    pub base_url: String,
    pub secret: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl CaptchaSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_port: u16,
    pub sender: String,
    pub recipient: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
}

impl EmailSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();

    // Read config file
    settings.merge(config::File::with_name("config"))?;

    // Environment overrides, e.g. APP_CAPTCHA__SECRET or APP_EMAIL__PASSWORD
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    // Parse config file into Setting struct

    settings.try_into()
}
