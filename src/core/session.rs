// src/core/session.rs

use crate::app_config::AppConfig;
use crate::services::driver::{wait_for, DriverError, Locator, UiDriver};
use log::{info, warn};

const USER_FIELD: &str = r#"input[type="text"]"#;
const PASS_FIELD: &str = r#"input[type="password"]"#;
const SUBMIT_BUTTON: &str = r#"input[type="submit"]"#;
/// Characteristic dashboard greeting shown once logged in.
const DASHBOARD_MARKER: &str = "HOLA";

/// Submits credentials and verifies the dashboard marker appears. `false`
/// means the session cannot be trusted and the run must abort.
pub async fn login(driver: &dyn UiDriver, config: &AppConfig) -> Result<bool, DriverError> {
    info!("Logging in...");

    driver
        .navigate(&config.url, config.navigation_timeout())
        .await?;
    driver.wait_for_idle(config.navigation_timeout()).await?;

    let user_field = wait_for(driver, &Locator::css(USER_FIELD), config.element_timeout()).await?;
    driver.fill(&user_field[0], &config.user).await?;

    let pass_fields = driver.locate(&Locator::css(PASS_FIELD)).await?;
    match pass_fields.first() {
        Some(field) => driver.fill(field, &config.pass).await?,
        None => {
            warn!("Password field not found on login page");
            return Ok(false);
        }
    }

    let submit = driver.locate(&Locator::css(SUBMIT_BUTTON)).await?;
    match submit.first() {
        Some(button) => driver.click(button).await?,
        None => {
            warn!("Submit control not found on login page");
            return Ok(false);
        }
    }
    driver.wait_for_idle(config.navigation_timeout()).await?;

    match wait_for(
        driver,
        &Locator::text(DASHBOARD_MARKER),
        config.element_timeout(),
    )
    .await
    {
        Ok(_) => {
            info!("Login successful");
            Ok(true)
        }
        Err(DriverError::Timeout(_, _)) => {
            warn!("Dashboard marker not found after login");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{FakeDriver, FakeSite};

    fn test_config() -> AppConfig {
        AppConfig {
            user: "someone@example.com".to_string(),
            pass: "secret".to_string(),
            element_timeout_ms: 1_000,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_login_succeeds_with_valid_site() {
        let driver = FakeDriver::new(FakeSite::default());
        let ok = login(&driver, &test_config()).await.unwrap();
        assert!(ok);
        assert_eq!(driver.filled_values(), vec!["someone@example.com", "secret"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_fails_without_dashboard_marker() {
        let mut site = FakeSite::default();
        site.login_succeeds = false;
        let driver = FakeDriver::new(site);
        let ok = login(&driver, &test_config()).await.unwrap();
        assert!(!ok);
    }
}
