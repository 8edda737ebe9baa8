use clap::Parser;
use patent_search::utils::error::ErrorSeverity;
use patent_search::utils::{logger, validation::Validate};
use patent_search::{AppConfig, CliArgs, PatentError, PatentService, UsptoClient, WebState};
use std::sync::Arc;

fn exit_code(e: &PatentError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: PatentError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting patent-search");

    // 載入設定檔，未指定時使用預設值
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path).unwrap_or_else(|e| fail(e))
        }
        None => AppConfig::default(),
    };
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        fail(e);
    }

    let client = UsptoClient::new(config.api.clone()).unwrap_or_else(|e| fail(e));
    let service = PatentService::new(Arc::new(client), config.search.clone());
    let state = WebState::new(service, &config);

    if let Err(e) = patent_search::serve(state, &config.server.host, config.server.port).await {
        fail(e);
    }
}
