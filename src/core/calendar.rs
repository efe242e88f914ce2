// src/core/calendar.rs

use crate::core::errors::CalendarError;
use crate::core::models::CalendarDay;
use crate::services::driver::{wait_for, DriverError, ElementHandle, Locator, UiDriver};
use itertools::Itertools;
use log::{debug, info, warn};
use std::time::Duration;

const DAY_CELL_SELECTOR: &str = r#"div[id^="date_"]"#;

/// Scans the rendered calendar and returns the eligible days, ascending by
/// day number, one entry per distinct number. Read-only: nothing is clicked.
pub async fn scan_eligible_days(
    driver: &dyn UiDriver,
    timeout: Duration,
) -> Result<Vec<CalendarDay>, CalendarError> {
    info!("Scanning calendar for available days...");

    let day_locator = Locator::css(DAY_CELL_SELECTOR);
    let cells = match wait_for(driver, &day_locator, timeout).await {
        Ok(cells) => cells,
        Err(DriverError::Timeout(_, _)) => return Err(CalendarError::NotDetected(timeout)),
        Err(e) => return Err(e.into()),
    };
    debug!("Calendar detected with {} day cells", cells.len());

    let mut days = Vec::new();
    for handle in cells {
        match read_day(driver, handle).await {
            Ok(Some(day)) => days.push(day),
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping unreadable day cell: {}", e);
                continue;
            }
        }
    }

    // The surface can expose the same logical day twice; first occurrence
    // wins, then order ascending.
    let eligible: Vec<CalendarDay> = days
        .into_iter()
        .unique_by(|day| day.number)
        .filter(CalendarDay::eligible)
        .sorted_by_key(|day| day.number)
        .collect();

    info!("{} days available for ordering", eligible.len());
    Ok(eligible)
}

async fn read_day(
    driver: &dyn UiDriver,
    handle: ElementHandle,
) -> Result<Option<CalendarDay>, DriverError> {
    let id = driver
        .element_attribute(&handle, "id")
        .await?
        .unwrap_or_default();
    let class = driver
        .element_attribute(&handle, "class")
        .await?
        .unwrap_or_default();

    let number = match parse_day_number(&id) {
        Some(n) => n,
        None => {
            let text = driver.element_text(&handle).await?;
            match first_number(&text) {
                Some(n) => n,
                None => {
                    debug!("Day cell `{}` carries no day number", id);
                    return Ok(None);
                }
            }
        }
    };

    let has = |token: &str| class.split_whitespace().any(|t| t == token);
    Ok(Some(CalendarDay {
        id,
        number,
        handle,
        is_future: has("futuro"),
        is_past: has("pasado"),
        has_no_service: has("sin-servicio"),
        has_existing_order: has("con-pedido"),
    }))
}

/// Day cell ids look like `date_2026-02-05`; the trailing field is the day.
fn parse_day_number(id: &str) -> Option<u32> {
    id.strip_prefix("date_")?
        .rsplit('-')
        .next()?
        .parse()
        .ok()
}

fn first_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{FakeDay, FakeDriver, FakeSite};

    fn site_with_days(days: Vec<FakeDay>) -> FakeDriver {
        let mut site = FakeSite::logged_in();
        site.days = days;
        FakeDriver::new(site)
    }

    #[test]
    fn test_parse_day_number_from_cell_id() {
        assert_eq!(parse_day_number("date_2026-02-05"), Some(5));
        assert_eq!(parse_day_number("date_2026-02-19"), Some(19));
        assert_eq!(parse_day_number("not_a_date"), None);
    }

    #[test]
    fn test_first_number_fallback() {
        assert_eq!(first_number("Lunes 12"), Some(12));
        assert_eq!(first_number("sin numero"), None);
    }

    #[tokio::test]
    async fn test_only_eligible_days_survive() {
        let driver = site_with_days(vec![
            FakeDay::new(3, "date futuro"),
            FakeDay::new(4, "date futuro sin-servicio"),
            FakeDay::new(5, "date futuro con-pedido"),
            FakeDay::new(6, "date pasado"),
            FakeDay::new(7, "date futuro pasado"),
        ]);
        let days = scan_eligible_days(&driver, Duration::from_secs(1))
            .await
            .unwrap();
        let numbers: Vec<u32> = days.iter().map(|d| d.number).collect();
        assert_eq!(numbers, vec![3]);
    }

    #[tokio::test]
    async fn test_deduplicates_by_day_number_first_wins() {
        let driver = site_with_days(vec![
            FakeDay::new(12, "date futuro"),
            FakeDay::new(5, "date futuro"),
            FakeDay::new(12, "date futuro sin-servicio"),
        ]);
        let days = scan_eligible_days(&driver, Duration::from_secs(1))
            .await
            .unwrap();
        let numbers: Vec<u32> = days.iter().map(|d| d.number).collect();
        // First day-12 cell wins (eligible) and output is ascending.
        assert_eq!(numbers, vec![5, 12]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_calendar_is_not_detected() {
        let driver = site_with_days(vec![]);
        let result = scan_eligible_days(&driver, Duration::from_secs(2)).await;
        assert!(matches!(result, Err(CalendarError::NotDetected(_))));
    }
}
