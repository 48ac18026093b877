use std::sync::Arc;

use color_eyre::eyre::Result;
use conduct_api::config::ApiConfig;
use conduct_core::{Workflow, policy::SystemClock};
use conduct_db::{PgStore, create_pool, schema::initialize_database};
use conduct_notifier::{Composer, Dispatcher, NotifierConfig, ResendMailer};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    let notifier_config = NotifierConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Email runs on its own worker; handlers only enqueue
    let (dispatcher, _worker) = Dispatcher::spawn(
        Arc::new(ResendMailer::new(&notifier_config)),
        Composer::new(&notifier_config),
    );

    let workflow = Workflow::new(
        Arc::new(PgStore::new(db_pool)),
        Arc::new(dispatcher),
        Arc::new(SystemClock::new(config.timezone)),
        config.policy,
    );

    info!(timezone = %config.timezone, "starting conduct");
    conduct_api::start_server(config, workflow).await?;

    Ok(())
}
