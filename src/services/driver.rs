// src/services/driver.rs

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{sleep, Duration, Instant};

/// Interval between attempts when polling for an element to appear.
const POLL_STEP: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),
    #[error("stale or unknown element handle {0}")]
    UnknownHandle(usize),
    #[error("driver backend error: {0}")]
    Backend(String),
}

/// Opaque reference to an element previously returned by `locate`.
/// Only meaningful to the driver that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub(crate) usize);

/// A single way of finding elements on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector, passed through to the backend.
    Css(String),
    /// Case-insensitive substring match against visible element text.
    Text(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(needle: impl Into<String>) -> Self {
        Locator::Text(needle.into())
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{}`", s),
            Locator::Text(t) => write!(f, "text `{}`", t),
        }
    }
}

/// The full capability set the ordering engine needs from a UI automation
/// backend. Everything above `services` talks to the site exclusively
/// through this trait, so any backend exposing these nine operations works.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;
    async fn wait_for_idle(&self, timeout: Duration) -> Result<(), DriverError>;
    async fn locate(&self, locator: &Locator) -> Result<Vec<ElementHandle>, DriverError>;
    async fn element_text(&self, handle: &ElementHandle) -> Result<String, DriverError>;
    async fn element_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;
    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError>;
    async fn fill(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError>;
    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DriverError>;
    async fn go_back(&self) -> Result<(), DriverError>;
}

/// Evaluates an ordered list of locator strategies and returns the matches of
/// the first strategy that finds anything. An empty result means no strategy
/// matched; locator evaluation errors other than "nothing found" surface.
pub async fn locate_any(
    driver: &dyn UiDriver,
    strategies: &[Locator],
) -> Result<Vec<ElementHandle>, DriverError> {
    for locator in strategies {
        let found = driver.locate(locator).await?;
        if !found.is_empty() {
            return Ok(found);
        }
    }
    Ok(Vec::new())
}

/// Polls an ordered strategy list until any strategy matches, bounded by
/// `timeout`. Controls that render a moment after the previous action still
/// get found instead of failing on a single attempt.
pub async fn wait_for_any(
    driver: &dyn UiDriver,
    strategies: &[Locator],
    timeout: Duration,
) -> Result<Vec<ElementHandle>, DriverError> {
    let deadline = Instant::now() + timeout;
    loop {
        let found = locate_any(driver, strategies).await?;
        if !found.is_empty() {
            return Ok(found);
        }
        if Instant::now() >= deadline {
            let described = strategies
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DriverError::Timeout(timeout, described));
        }
        sleep(POLL_STEP.min(timeout)).await;
    }
}

/// Polls for a locator to match at least one element, bounded by `timeout`.
/// Returns the matches once present, or `DriverError::Timeout` at the deadline.
pub async fn wait_for(
    driver: &dyn UiDriver,
    locator: &Locator,
    timeout: Duration,
) -> Result<Vec<ElementHandle>, DriverError> {
    let deadline = Instant::now() + timeout;
    loop {
        let found = driver.locate(locator).await?;
        if !found.is_empty() {
            return Ok(found);
        }
        if Instant::now() >= deadline {
            return Err(DriverError::Timeout(timeout, locator.to_string()));
        }
        sleep(POLL_STEP.min(timeout)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{FakeDriver, FakeSite};

    #[tokio::test]
    async fn test_locate_any_returns_first_matching_strategy() {
        let driver = FakeDriver::new(FakeSite::logged_in());
        let strategies = vec![
            Locator::css("div.does-not-exist"),
            Locator::text("HOLA"),
        ];
        let found = locate_any(&driver, &strategies).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_locate_any_empty_when_nothing_matches() {
        let driver = FakeDriver::new(FakeSite::logged_in());
        let strategies = vec![Locator::css("div.nope"), Locator::text("ADIOS")];
        let found = locate_any(&driver, &strategies).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_any_times_out_when_no_strategy_matches() {
        let driver = FakeDriver::new(FakeSite::logged_in());
        let strategies = vec![Locator::css("div.nope"), Locator::text("NADA")];
        let result = wait_for_any(&driver, &strategies, Duration::from_secs(2)).await;
        assert!(matches!(result, Err(DriverError::Timeout(_, _))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_times_out_on_absent_element() {
        let driver = FakeDriver::new(FakeSite::logged_in());
        let result = wait_for(
            &driver,
            &Locator::text("NO SUCH TEXT"),
            Duration::from_secs(2),
        )
        .await;
        assert!(matches!(result, Err(DriverError::Timeout(_, _))));
    }
}
