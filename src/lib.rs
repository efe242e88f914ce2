use crate::app_config::AppConfig;
use crate::core::calendar;
use crate::core::errors::{AgentError, CalendarError};
use crate::core::pipeline::OrderPipeline;
use crate::core::reporting::RunSummary;
use crate::core::selector::{IndexPicker, RandomPicker};
use crate::core::session;
use crate::services::driver::UiDriver;
use log::info;
use tokio::time::{sleep, Duration};

pub mod app_config;
pub mod core;
pub mod services;

/// Pause between days so the site settles before the next cell click.
const INTER_DAY_PAUSE: Duration = Duration::from_secs(1);

/// Runs the full ordering flow: authenticate, scan the calendar, process
/// each eligible day in ascending order, aggregate outcomes. Only missing
/// credentials, a failed login or a driver failure outside the day loop
/// abort the run; day-level failures are contained in the summary.
pub async fn run_agent(
    driver: &dyn UiDriver,
    config: &AppConfig,
    dry_run: bool,
) -> Result<RunSummary, AgentError> {
    run_agent_with_picker(driver, config, dry_run, &RandomPicker).await
}

pub async fn run_agent_with_picker(
    driver: &dyn UiDriver,
    config: &AppConfig,
    dry_run: bool,
    picker: &dyn IndexPicker,
) -> Result<RunSummary, AgentError> {
    if !config.has_credentials() {
        return Err(AgentError::MissingCredentials);
    }

    if !session::login(driver, config).await? {
        return Err(AgentError::Auth);
    }

    let days = match calendar::scan_eligible_days(driver, config.element_timeout()).await {
        Ok(days) => days,
        Err(CalendarError::NotDetected(timeout)) => {
            info!("Calendar not detected within {:?}; nothing to do", timeout);
            Vec::new()
        }
        Err(CalendarError::Driver(e)) => return Err(e.into()),
    };

    if days.is_empty() {
        info!("No days pending; everything is already ordered or without service");
        return Ok(RunSummary::default());
    }
    info!(
        "Days to process: {:?}",
        days.iter().map(|d| d.number).collect::<Vec<_>>()
    );

    let pipeline = OrderPipeline::new(driver, config, picker, dry_run);
    let mut summary = RunSummary::default();
    for day in &days {
        // The pipeline always restores the calendar view before returning,
        // so each day starts from a known state.
        let outcome = pipeline.process_day(day).await;
        summary.record(&outcome);
        sleep(INTER_DAY_PAUSE).await;
    }
    Ok(summary)
}
