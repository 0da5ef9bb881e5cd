use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use task_service::config::Config;
use task_service::domain::task::ports::TaskServicePort;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::ports::AuthServicePort;
use task_service::domain::user::service::AuthService;
use task_service::inbound::http::router::create_router;
use task_service::outbound::repositories::InMemoryTaskRepository;
use task_service::outbound::repositories::InMemoryUserRepository;
use task_service::outbound::repositories::PostgresTaskRepository;
use task_service::outbound::repositories::PostgresUserRepository;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "task-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    let persistence = match config.database.url {
        Some(_) => "postgresql",
        None => "memory",
    };
    tracing::info!(
        http_port = config.server.http_port,
        persistence,
        token_ttl_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let password_hasher = PasswordHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let mut authenticator = Authenticator::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::minutes(config.jwt.expiration_minutes),
        password_hasher,
    )?;
    if let Some(dummy_hash) = config.password.dummy_hash.clone() {
        authenticator = authenticator.with_dummy_hash(dummy_hash)?;
    }
    let authenticator = Arc::new(authenticator);

    let (auth_service, task_service): (Arc<dyn AuthServicePort>, Arc<dyn TaskServicePort>) =
        match &config.database.url {
            Some(database_url) => {
                let pg_pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .connect(database_url)
                    .await?;
                tracing::info!(
                    max_connections = config.database.max_connections,
                    database = "postgresql",
                    "Database connection pool created"
                );

                sqlx::migrate!("./migrations").run(&pg_pool).await?;
                tracing::info!(database = "postgresql", "Database migrations completed");

                let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
                let task_repository = Arc::new(PostgresTaskRepository::new(pg_pool));

                let auth_service: Arc<dyn AuthServicePort> =
                    Arc::new(AuthService::new(user_repository, Arc::clone(&authenticator)));
                let task_service: Arc<dyn TaskServicePort> =
                    Arc::new(TaskService::new(task_repository));
                (auth_service, task_service)
            }
            None => {
                tracing::warn!("No database url configured, data is kept in memory only");

                let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::clone(&authenticator),
                ));
                let task_service: Arc<dyn TaskServicePort> =
                    Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::new())));
                (auth_service, task_service)
            }
        };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, task_service, authenticator);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
