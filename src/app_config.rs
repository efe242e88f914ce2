use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Immutable run configuration. Built once at startup from defaults, an
/// optional `config` file, and `SOCIALLUNCH_`-prefixed environment
/// variables; passed by reference into every component.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub url: String,
    pub user: String,
    pub pass: String,
    pub location: String,
    pub salad_keywords: Vec<String>,
    pub dessert_keywords: Vec<String>,
    pub drink_keywords: Vec<String>,
    pub navigation_timeout_ms: u64,
    pub element_timeout_ms: u64,
    pub action_delay_ms: u64,
    pub webdriver_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("url", "https://app.sociallunch.com.ar/")?
            .set_default("user", "")?
            .set_default("pass", "")?
            .set_default("location", "COHEN PISO 1")?
            .set_default("salad_keywords", vec!["ensalada".to_string()])?
            .set_default(
                "dessert_keywords",
                vec![
                    "alfajor de chocolate".to_string(),
                    "cookie".to_string(),
                    "cuadrado de limon".to_string(),
                    "cuadrado de limón".to_string(),
                ],
            )?
            .set_default(
                "drink_keywords",
                vec![
                    "coca zero".to_string(),
                    "coca-cola zero".to_string(),
                    "pepsi light".to_string(),
                    "pepsi zero".to_string(),
                ],
            )?
            .set_default("navigation_timeout_ms", 30_000)?
            .set_default("element_timeout_ms", 10_000)?
            .set_default("action_delay_ms", 1_500)?
            .set_default("webdriver_url", "http://localhost:4444")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("SOCIALLUNCH"))
            .build()?;

        settings.try_deserialize()
    }

    /// Credentials are the only settings without a usable default.
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.pass.is_empty()
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: "https://app.sociallunch.com.ar/".to_string(),
            user: String::new(),
            pass: String::new(),
            location: "COHEN PISO 1".to_string(),
            salad_keywords: vec!["ensalada".to_string()],
            dessert_keywords: vec![
                "alfajor de chocolate".to_string(),
                "cookie".to_string(),
                "cuadrado de limon".to_string(),
                "cuadrado de limón".to_string(),
            ],
            drink_keywords: vec![
                "coca zero".to_string(),
                "coca-cola zero".to_string(),
                "pepsi light".to_string(),
                "pepsi zero".to_string(),
            ],
            navigation_timeout_ms: 30_000,
            element_timeout_ms: 10_000,
            action_delay_ms: 1_500,
            webdriver_url: "http://localhost:4444".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_credentials() {
        let config = AppConfig::default();
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_timeout_accessors() {
        let config = AppConfig::default();
        assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(config.element_timeout(), Duration::from_secs(10));
        assert_eq!(config.action_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_credentials_detected_when_both_present() {
        let config = AppConfig {
            user: "someone@example.com".to_string(),
            pass: "secret".to_string(),
            ..AppConfig::default()
        };
        assert!(config.has_credentials());
    }
}
