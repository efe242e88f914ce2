// src/main.rs

use clap::Parser;
use dotenvy::dotenv;
use log::error;
use sociallunch::app_config::AppConfig;
use sociallunch::core::errors::AgentError;
use sociallunch::run_agent;
use sociallunch::services::webdriver::WebDriver;

#[derive(Parser, Debug)]
#[command(
    name = "sociallunch_bot",
    about = "Automated monthly meal ordering for Social Lunch"
)]
struct Cli {
    /// Run with a visible browser window instead of headless
    #[arg(long)]
    visible: bool,

    /// Walk the full flow and day classification without selecting or
    /// confirming anything
    #[arg(long)]
    dry_run: bool,

    /// WebDriver endpoint to attach to (overrides configuration)
    #[arg(long)]
    webdriver_url: Option<String>,
}

fn print_banner(config: &AppConfig, dry_run: bool) {
    println!("{}", "=".repeat(60));
    println!("SOCIAL LUNCH - AUTOMATED ORDERING AGENT");
    println!("{}", "=".repeat(60));
    println!("Date: {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    println!("User: ***");
    println!("Location: {}", config.location);
    if dry_run {
        println!("DRY-RUN MODE: no orders will be placed");
    }
    println!("{}", "=".repeat(60));
}

async fn run(cli: Cli) -> Result<i32, AgentError> {
    let mut config = AppConfig::new()?;
    if let Some(url) = cli.webdriver_url {
        config.webdriver_url = url;
    }
    // Fatal before any driver interaction.
    if !config.has_credentials() {
        return Err(AgentError::MissingCredentials);
    }

    print_banner(&config, cli.dry_run);

    let driver = WebDriver::connect(&config.webdriver_url, cli.visible).await?;
    let result = run_agent(&driver, &config, cli.dry_run).await;
    // The session is released on every exit path, success or failure.
    driver.close().await;

    let summary = result?;
    println!("{}", summary.format_summary());
    Ok(summary.exit_code())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    dotenv().ok();
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}
