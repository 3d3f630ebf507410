use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shared::{Config, DailyBriefing, Scheduler, ScheduledJob, TriggerTime};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "daily-briefing")]
#[command(about = "Send a daily summarized news briefing from The Guardian to Telegram")]
struct Args {
    /// Time of day to send the briefing (HH:MM, local time)
    #[arg(long)]
    at: Option<TriggerTime>,

    /// Run the briefing once right now and exit
    #[arg(long)]
    now: bool,

    /// Guardian section to pull articles from (e.g. world, technology)
    #[arg(long)]
    section: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = Config::from_env()?;

    if let Some(at) = args.at {
        config.briefing_time = at;
    }
    if let Some(section) = args.section {
        config.guardian_section = section;
    }

    let job = DailyBriefing::from_config(&config).context("Failed to set up briefing pipeline")?;

    if args.now {
        job.execute().await;
        return Ok(());
    }

    info!(
        at = %config.briefing_time,
        section = %config.guardian_section,
        "News briefing started"
    );

    let mut scheduler = Scheduler::new(config.briefing_time, Local::now().naive_local());
    scheduler.run_forever(&job).await;

    Ok(())
}
