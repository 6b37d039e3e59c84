use std::sync::Arc;

use clap::Parser;
use food_db_client::FoodDatabase;
use food_db_client::http_client::ReqwestFoodClient;

use fittrack::cli::{Cli, Context, run};
use fittrack::config::Config;
use fittrack::store::JsonFileStore;
use fittrack::RandomIds;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `FITTRACK_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("FITTRACK_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Keep HTTP internals quiet by default
    let combined_filter = format!("{},reqwest=warn,hyper=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,reqwest=warn,hyper=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!("fittrack: log filter: {}", log_env);

    let cli = Cli::parse();
    let config = Config::from_env();

    let data_dir = cli.data_dir.clone().unwrap_or(config.data_dir);
    let store = JsonFileStore::new(&data_dir);
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let client = config.food_db.as_ref().map(ReqwestFoodClient::from_config);
    let ctx = Context {
        store: &store,
        ids: Arc::new(RandomIds),
        food_db: client.as_ref().map(|c| c as &dyn FoodDatabase),
        today: chrono::Local::now().date_naive(),
        timeline_range: config.timeline_range,
        default_page_size: config
            .food_db
            .as_ref()
            .map(|c| c.page_size)
            .unwrap_or(food_db_client::DEFAULT_PAGE_SIZE),
    };

    let mut stdout = std::io::stdout().lock();
    run(cli, &ctx, &mut stdout).await?;
    Ok(())
}
