//! Sends today's detention monitor reminders. Meant to run once a day from
//! cron; every run sends again.

use std::sync::Arc;

use color_eyre::eyre::Result;
use conduct_api::config::ApiConfig;
use conduct_core::{Workflow, policy::SystemClock};
use conduct_db::{PgStore, create_pool};
use conduct_notifier::{
    Composer, Dispatcher, NotifierConfig, ResendMailer, reminders::run_monitor_reminders,
};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    let notifier_config = NotifierConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db_pool = create_pool(&config.database_url).await?;

    let (dispatcher, worker) = Dispatcher::spawn(
        Arc::new(ResendMailer::new(&notifier_config)),
        Composer::new(&notifier_config),
    );
    let dispatcher = Arc::new(dispatcher);
    let workflow = Workflow::new(
        Arc::new(PgStore::new(db_pool)),
        dispatcher.clone(),
        Arc::new(SystemClock::new(config.timezone)),
        config.policy,
    );

    let queued = run_monitor_reminders(&workflow, &dispatcher).await?;

    // Closing every handle lets the worker drain and report
    drop(workflow);
    drop(dispatcher);
    let stats = worker.await?;
    if stats.failed > 0 {
        warn!(failed = stats.failed, "some reminders were not delivered");
    }
    info!(queued, sent = stats.sent, "reminder run complete");

    Ok(())
}
