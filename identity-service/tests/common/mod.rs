use std::sync::Arc;

use identity_service::domain::user::service::CredentialStore;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::notifications::LogNotifier;
use identity_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const TEST_API_KEY: &str = "test-api-key";

pub type TestStore = CredentialStore<InMemoryUserRepository, LogNotifier>;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<TestStore>,
    pub api_client: reqwest::Client,
}

/// A store over a fresh in-memory repository
pub fn test_store() -> TestStore {
    CredentialStore::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(LogNotifier::new()),
    )
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(test_store());
        let router = create_router(Arc::clone(&store), TEST_API_KEY.to_string());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Request without any API key
    pub fn anonymous(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .request(method, format!("{}{}", self.address, path))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.anonymous(method, path)
            .header("Authorization", TEST_API_KEY)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::POST, path)
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::PUT, path)
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::DELETE, path)
    }

    /// Add an active user through the API and return its response data
    pub async fn add_user(&self, email: &str, username: &str, password: &str) -> Value {
        let response = self
            .post("/api/users")
            .json(&json!({
                "email": email,
                "username": username,
                "password": password,
                "is_editor": true
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Authenticate and return the response status
    pub async fn authenticate(&self, email: &str, password: &str) -> reqwest::StatusCode {
        self.post("/api/auth/authenticate")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .status()
    }
}

/// Throwaway Postgres database with migrations applied
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

impl TestDb {
    /// Create a new test database with a unique name.
    ///
    /// Returns None when `DATABASE_URL` is unset, so suites that need a
    /// server are skipped on machines without one.
    pub async fn new() -> Option<Self> {
        let Ok(server_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return None;
        };

        let db_name = format!(
            "test_identity_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE);"#, db_name).as_str(),
                    )
                    .await;
            }
        });
    }
}
