// region:    --- Imports
use bidboard::config::{Config, ConfigError};
use bidboard::database::DatabaseManager;
use bidboard::handlers::{self, AppState};
use bidboard::oauth::GoogleIdentityProvider;
use bidboard::scheduler::SessionScheduler;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

#[derive(Debug, Error)]
enum InitError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Error preparing database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

fn install_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bidboard=info,tower_http=info".into()),
        )
        .without_time()
        .with_target(false)
        .init();
}

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let config = Config::from_env()?;

    // DatabaseManager 생성
    let db_manager = Arc::new(
        DatabaseManager::connect(&config.database_url, config.database_max_connections).await?,
    );

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 만료 세션 정리
    SessionScheduler::new(Arc::clone(&db_manager)).start();

    if config.google_client_id.is_empty() {
        warn!("{:<12} --> GOOGLE_CLIENT_ID 미설정, 외부 인증 비활성", "Main");
    }
    let identity_provider = Arc::new(GoogleIdentityProvider::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.oauth_redirect_uri(),
    ));

    let server_address = config.socket_addr();
    let state = AppState {
        db_manager,
        config: Arc::new(config),
        identity_provider,
    };
    let routes_all = handlers::routes(state);

    let listener = TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!("{:<12} --> Web Server: Listening on {}", "Main", server_address);

    axum::serve(listener, routes_all)
        .await
        .map_err(InitError::TcpServe)?;
    Ok(())
}
// endregion: --- Main
