use std::sync::Arc;

use anyhow::Context;
use identity_service::config::BootstrapConfig;
use identity_service::config::Config;
use identity_service::domain::user::models::AddUserCommand;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::Password;
use identity_service::domain::user::models::Username;
use identity_service::domain::user::ports::CredentialStorePort;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::CredentialStore;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::notifications::LogNotifier;
use identity_service::outbound::repositories::InMemoryUserRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        in_memory = config.database.is_memory(),
        bootstrap = config.bootstrap.is_some(),
        "Configuration loaded"
    );

    if config.database.is_memory() {
        tracing::warn!("Using in-memory user repository, data is lost on exit");
        return serve(InMemoryUserRepository::new(), &config).await;
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    serve(PostgresUserRepository::new(pg_pool), &config).await
}

async fn serve<R: UserRepository>(repository: R, config: &Config) -> Result<(), anyhow::Error> {
    let store = Arc::new(CredentialStore::new(
        Arc::new(repository),
        Arc::new(LogNotifier::new()),
    ));

    if let Some(ref bootstrap) = config.bootstrap {
        bootstrap_admin(store.as_ref(), bootstrap).await?;
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(store, config.api.key.clone());
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

/// Seed the configured administrator unless that email is already registered.
async fn bootstrap_admin<S: CredentialStorePort>(
    store: &S,
    bootstrap: &BootstrapConfig,
) -> Result<(), anyhow::Error> {
    let email = EmailAddress::new(bootstrap.admin_email.clone())?;

    if store.user_exists(&email).await? {
        tracing::debug!("Bootstrap administrator already present");
        return Ok(());
    }

    let command = AddUserCommand::new(
        email,
        Username::new(bootstrap.admin_username.clone())?,
        Password::new(bootstrap.admin_password.clone())?,
        true,
        true,
    );
    let admin = store.add_user(command).await?;

    tracing::info!(user_id = %admin.id, "Bootstrap administrator created");
    Ok(())
}
