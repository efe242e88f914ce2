// src/core/pipeline.rs

use crate::app_config::AppConfig;
use crate::core::errors::DayError;
use crate::core::models::{CalendarDay, DayOutcome, DayStatus, MenuItem, SelectionOutcome};
use crate::core::selector::{self, IndexPicker};
use crate::services::driver::{wait_for, wait_for_any, DriverError, Locator, UiDriver};
use log::{debug, info, warn};
use tokio::time::{sleep, Duration};

const ITEM_SELECTOR: &str = "input.selection_items";
const NO_SERVICE_BANNER: &str = "DÍA SIN SERVICIO";
const RETURN_BUTTON: &str = "VOLVER";
/// The location modal either shows quickly or not at all.
const LOCATION_PROMPT_TIMEOUT: Duration = Duration::from_secs(5);

fn confirm_strategies() -> [Locator; 2] {
    [
        Locator::css(r#"input[value="CONFIRMAR"]"#),
        Locator::text("confirmar"),
    ]
}

/// Drives the ordering flow for one day at a time: location, service check,
/// the three category selections, confirmation, and return to the calendar.
/// Failures are contained per day; the caller keeps iterating regardless.
pub struct OrderPipeline<'a> {
    driver: &'a dyn UiDriver,
    config: &'a AppConfig,
    picker: &'a dyn IndexPicker,
    dry_run: bool,
}

impl<'a> OrderPipeline<'a> {
    pub fn new(
        driver: &'a dyn UiDriver,
        config: &'a AppConfig,
        picker: &'a dyn IndexPicker,
        dry_run: bool,
    ) -> Self {
        Self {
            driver,
            config,
            picker,
            dry_run,
        }
    }

    /// Processes one eligible day start to finish. Always returns an
    /// outcome; on failure the calendar view is recovered first so the next
    /// day starts from a known state.
    pub async fn process_day(&self, day: &CalendarDay) -> DayOutcome {
        info!("================ Day {} ({}) ================", day.number, day.id);

        if self.dry_run {
            info!("[dry-run] Day {} would be ordered", day.number);
            return DayOutcome {
                number: day.number,
                status: DayStatus::Success,
            };
        }

        match self.run_day(day).await {
            Ok(status) => DayOutcome {
                number: day.number,
                status,
            },
            Err(e) => {
                warn!("Day {} failed: {}", day.number, e);
                self.recover_to_calendar().await;
                DayOutcome::failed(day.number, e.to_string())
            }
        }
    }

    async fn run_day(&self, day: &CalendarDay) -> Result<DayStatus, DayError> {
        self.driver.click(&day.handle).await?;
        self.pause().await;

        self.select_location().await?;
        self.driver
            .wait_for_idle(self.config.navigation_timeout())
            .await?;

        if self.has_no_service().await? {
            info!("Day {} has no service, skipping", day.number);
            self.recover_to_calendar().await;
            return Ok(DayStatus::Skipped);
        }

        let categories = [
            ("ENSALADAS", &self.config.salad_keywords),
            ("POSTRES", &self.config.dessert_keywords),
            ("BEBIDAS", &self.config.drink_keywords),
        ];
        for (category, keywords) in categories {
            // A missing side dish should not forfeit an otherwise valid
            // order; category failures stay inside the day.
            if let Err(e) = self.select_category(category, keywords).await {
                warn!("Category {} skipped: {}", category, e);
            }
        }

        self.confirm().await?;
        self.recover_to_calendar().await;
        Ok(DayStatus::Success)
    }

    /// Clicks the configured location if its modal shows up. The prompt not
    /// appearing means the location is already set; that is a no-op, not an
    /// error.
    async fn select_location(&self) -> Result<(), DriverError> {
        let locator = Locator::text(&self.config.location);
        let timeout = LOCATION_PROMPT_TIMEOUT.min(self.config.element_timeout());
        match wait_for(self.driver, &locator, timeout).await {
            Ok(options) => {
                self.driver.click(&options[0]).await?;
                self.pause().await;
                info!("Location selected: {}", self.config.location);
            }
            Err(DriverError::Timeout(_, _)) => {
                debug!("Location prompt did not appear, continuing");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// The banner text can also sit in a hidden template node, so every
    /// match is checked until a displayed one is found.
    async fn has_no_service(&self) -> Result<bool, DriverError> {
        let banners = self.driver.locate(&Locator::text(NO_SERVICE_BANNER)).await?;
        for banner in &banners {
            if self.driver.is_visible(banner).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn select_category(&self, category: &str, keywords: &[String]) -> Result<(), DayError> {
        info!("Selecting from {}...", category);

        let tab = Locator::css(format!(r#"div[data-dimension="{}"]"#, category));
        let tabs = wait_for(self.driver, &tab, self.config.element_timeout()).await?;
        self.driver.click(&tabs[0]).await?;
        self.pause().await;
        self.driver
            .wait_for_idle(self.config.navigation_timeout())
            .await?;

        let handles = self.driver.locate(&Locator::css(ITEM_SELECTOR)).await?;
        let mut candidates = Vec::with_capacity(handles.len());
        for handle in handles {
            let description = self
                .driver
                .element_attribute(&handle, "data-desc")
                .await?
                .unwrap_or_default();
            candidates.push(MenuItem::new(description, handle));
        }
        debug!("{} items listed in {}", candidates.len(), category);

        let chosen = match selector::select(&candidates, keywords, self.picker) {
            SelectionOutcome::Matched(item) => {
                info!("Adding preferred item: {}", item.description);
                item
            }
            SelectionOutcome::FallbackFirst(item) => {
                info!(
                    "No preference matched in {}, taking first option: {}",
                    category, item.description
                );
                item
            }
            SelectionOutcome::Unavailable => {
                return Err(DayError::CategoryUnavailable(category.to_string()));
            }
        };
        self.driver.click(&chosen.handle).await?;
        self.pause().await;
        Ok(())
    }

    async fn confirm(&self) -> Result<(), DayError> {
        info!("Confirming order...");
        let found = wait_for_any(
            self.driver,
            &confirm_strategies(),
            self.config.element_timeout(),
        )
        .await
        .map_err(DayError::Confirmation)?;
        self.driver
            .click(&found[0])
            .await
            .map_err(DayError::Confirmation)?;
        self.pause().await;
        info!("Order confirmed");
        Ok(())
    }

    /// Two-step recovery back to the calendar, shared by the success path,
    /// the no-service skip and every day-level failure handler: click the
    /// structured return control if present, otherwise re-navigate to the
    /// service root.
    async fn recover_to_calendar(&self) {
        if let Ok(buttons) = self.driver.locate(&Locator::text(RETURN_BUTTON)).await {
            if let Some(button) = buttons.first() {
                if self.driver.click(button).await.is_ok() {
                    let _ = self
                        .driver
                        .wait_for_idle(self.config.navigation_timeout())
                        .await;
                    return;
                }
            }
        }
        if let Err(e) = self
            .driver
            .navigate(&self.config.url, self.config.navigation_timeout())
            .await
        {
            warn!("Could not recover to calendar view: {}", e);
        }
    }

    async fn pause(&self) {
        sleep(self.config.action_delay()).await;
    }
}
