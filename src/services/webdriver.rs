// src/services/webdriver.rs

use crate::services::driver::{DriverError, ElementHandle, Locator, UiDriver};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use log::{debug, warn};
use serde_json::json;
use std::sync::Mutex;
use tokio::time::{sleep, timeout, Duration, Instant};

const READY_STATE_POLL: Duration = Duration::from_millis(500);
/// Extra settle time after the document reports complete, for late XHR
/// updates the WebDriver protocol cannot observe.
const SETTLE_DELAY: Duration = Duration::from_secs(1);

fn backend_err(e: CmdError) -> DriverError {
    DriverError::Backend(e.to_string())
}

/// `UiDriver` over a WebDriver session. Element handles index into a
/// registry of located elements; the registry is kept for the whole session
/// since calendar cells are clicked long after they were located.
pub struct WebDriver {
    client: Client,
    elements: Mutex<Vec<Element>>,
}

impl WebDriver {
    /// Attaches to a running WebDriver endpoint (chromedriver or
    /// equivalent). Headless unless a visible window was requested.
    pub async fn connect(webdriver_url: &str, visible: bool) -> Result<Self, DriverError> {
        let mut args = vec!["--window-size=1280,800".to_string()];
        if !visible {
            args.push("--headless=new".to_string());
        }
        let mut capabilities = serde_json::map::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            elements: Mutex::new(Vec::new()),
        })
    }

    /// Ends the browser session. Called on every exit path.
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            warn!("Failed to close browser session: {}", e);
        }
    }

    fn register(&self, found: Vec<Element>) -> Vec<ElementHandle> {
        let mut elements = self.elements.lock().unwrap();
        found
            .into_iter()
            .map(|element| {
                elements.push(element);
                ElementHandle(elements.len() - 1)
            })
            .collect()
    }

    fn resolve(&self, handle: &ElementHandle) -> Result<Element, DriverError> {
        self.elements
            .lock()
            .unwrap()
            .get(handle.0)
            .cloned()
            .ok_or(DriverError::UnknownHandle(handle.0))
    }
}

/// XPath matching any element whose direct text contains the needle,
/// case-insensitively (including the accented letters the site uses).
fn text_xpath(needle: &str) -> String {
    const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZÁÉÍÓÚÜÑ";
    const LOWER: &str = "abcdefghijklmnopqrstuvwxyzáéíóúüñ";
    let needle = needle.to_lowercase().replace('\'', "");
    format!(
        "//*[text()[contains(translate(., '{}', '{}'), '{}')]]",
        UPPER, LOWER, needle
    )
}

#[async_trait]
impl UiDriver for WebDriver {
    async fn navigate(&self, url: &str, nav_timeout: Duration) -> Result<(), DriverError> {
        debug!("Navigating to {}", url);
        match timeout(nav_timeout, self.client.goto(url)).await {
            Ok(result) => result.map_err(backend_err),
            Err(_) => Err(DriverError::Timeout(nav_timeout, format!("goto {}", url))),
        }
    }

    async fn wait_for_idle(&self, idle_timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + idle_timeout;
        loop {
            let state = self
                .client
                .execute("return document.readyState;", vec![])
                .await
                .map_err(backend_err)?;
            if state.as_str() == Some("complete") {
                sleep(SETTLE_DELAY.min(idle_timeout)).await;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(
                    idle_timeout,
                    "document.readyState".to_string(),
                ));
            }
            sleep(READY_STATE_POLL).await;
        }
    }

    async fn locate(&self, locator: &Locator) -> Result<Vec<ElementHandle>, DriverError> {
        let found = match locator {
            Locator::Css(css) => self
                .client
                .find_all(WdLocator::Css(css))
                .await
                .map_err(backend_err)?,
            Locator::Text(needle) => {
                let xpath = text_xpath(needle);
                self.client
                    .find_all(WdLocator::XPath(&xpath))
                    .await
                    .map_err(backend_err)?
            }
        };
        Ok(self.register(found))
    }

    async fn element_text(&self, handle: &ElementHandle) -> Result<String, DriverError> {
        let element = self.resolve(handle)?;
        element.text().await.map_err(backend_err)
    }

    async fn element_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let element = self.resolve(handle)?;
        element.attr(name).await.map_err(backend_err)
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        let element = self.resolve(handle)?;
        element.click().await.map_err(backend_err)
    }

    async fn fill(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError> {
        let element = self.resolve(handle)?;
        element.clear().await.map_err(backend_err)?;
        element.send_keys(value).await.map_err(backend_err)
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DriverError> {
        let element = self.resolve(handle)?;
        element.is_displayed().await.map_err(backend_err)
    }

    async fn go_back(&self) -> Result<(), DriverError> {
        self.client.back().await.map_err(backend_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_xpath_lowercases_needle() {
        let xpath = text_xpath("CONFIRMAR");
        assert!(xpath.contains("'confirmar'"));
        assert!(xpath.contains("translate"));
    }

    #[test]
    fn test_text_xpath_strips_quotes() {
        let xpath = text_xpath("O'Brien");
        assert!(xpath.contains("'obrien'"));
    }
}
