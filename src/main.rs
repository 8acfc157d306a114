use clap::Parser;
use portfolio_api::adapters::http::{build_router, cors_layer, serve, shutdown_signal};
use portfolio_api::core::{Notifier, StatusCheckStore, SubmissionStore};
use portfolio_api::utils::error::ErrorCategory;
use portfolio_api::utils::{logger, validation::Validate};
use portfolio_api::{
    AppConfig, AppState, CliConfig, ContactIntake, MemoryStore, MongoStore, PortfolioProvider,
    Result, SmtpRelay,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting portfolio-api");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ portfolio-api failed: {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.category() {
            ErrorCategory::Deployment => 1,
            ErrorCategory::Client => 2,
            ErrorCategory::Infrastructure => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    // 讀取並驗證環境設定
    let config = AppConfig::from_env()?;
    config.validate()?;
    tracing::debug!("Environment config: {:?}", config);

    let portfolio = match &cli.portfolio_file {
        Some(path) => PortfolioProvider::from_file(path)?,
        None => PortfolioProvider::embedded(),
    };
    if let Err(e) = portfolio.get_portfolio() {
        tracing::warn!("⚠️ /api/portfolio will answer 500 until fixed: {}", e);
    }

    let cors = cors_layer(&config)?;
    let relay = SmtpRelay::new(config.smtp_settings());
    tracing::info!(
        bind = %cli.bind,
        store = if cli.memory_store { "memory" } else { "mongodb" },
        notifications = relay.is_enabled(),
        cors_any_origin = config.allows_any_origin(),
        "Startup configuration"
    );
    let notifier: Arc<dyn Notifier> = Arc::new(relay);

    if cli.memory_store {
        tracing::warn!("Using in-memory store, submissions are lost on restart");
        run_with_store(MemoryStore::new(), notifier, portfolio, cors, cli.bind).await
    } else {
        let (url, db_name) = config.mongo()?;
        let store = MongoStore::connect(url, db_name).await?;
        run_with_store(store, notifier, portfolio, cors, cli.bind).await
    }
}

async fn run_with_store<S>(
    store: S,
    notifier: Arc<dyn Notifier>,
    portfolio: PortfolioProvider,
    cors: CorsLayer,
    bind: SocketAddr,
) -> Result<()>
where
    S: SubmissionStore + StatusCheckStore + Clone + 'static,
{
    let intake = ContactIntake::new(store.clone(), notifier);
    let router = build_router(AppState::new(intake, portfolio), cors);

    let listener = TcpListener::bind(bind).await?;
    let result = serve(listener, router, shutdown_signal()).await;

    // 不論 serve 是否成功都要關閉連線
    store.close().await;
    result
}
