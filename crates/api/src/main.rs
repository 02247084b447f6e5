use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use quill_api::config::{LogFormat, ServerConfig};
use quill_api::router::build_app_router;
use quill_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "quill_api=debug,quill_db=debug,tower_http=debug";

/// Anything that stops the server from coming up.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid HOST '{0}'")]
    InvalidHost(String),
    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed to start");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        media_root = %config.media_root.display(),
        index_cache_secs = config.index_cache_secs,
        "Loaded server configuration"
    );

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| StartupError::MissingDatabaseUrl)?;
    let pool = quill_db::create_pool(&database_url).await?;
    quill_db::health_check(&pool).await?;
    quill_db::run_migrations(&pool).await?;
    tracing::info!("Database ready, migrations applied");

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .map_err(|source| StartupError::Io {
            context: "cannot create media root",
            source,
        })?;

    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| StartupError::InvalidHost(config.host.clone()))?;
    let addr = SocketAddr::new(ip, config.port);

    let state = AppState::new(pool, config.clone());
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Io {
            context: "cannot bind listen address",
            source,
        })?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| StartupError::Io {
            context: "server error",
            source,
        })?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, draining connections"),
        () = terminate => tracing::info!("Terminated, draining connections"),
    }
}
