use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use task_service::domain::task::ports::TaskServicePort;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::ports::AuthServicePort;
use task_service::domain::user::service::AuthService;
use task_service::inbound::http::router::create_router;
use task_service::outbound::repositories::InMemoryTaskRepository;
use task_service::outbound::repositories::InMemoryUserRepository;
use task_service::outbound::repositories::PostgresTaskRepository;
use task_service::outbound::repositories::PostgresUserRepository;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub db: Option<TestDb>,
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

impl TestApp {
    /// Spawn the application backed by in-memory storage
    pub async fn spawn() -> Self {
        Self::spawn_with_ttl(chrono::Duration::minutes(60)).await
    }

    /// Spawn with a custom token lifetime; a negative one issues already
    /// expired tokens.
    pub async fn spawn_with_ttl(token_ttl: chrono::Duration) -> Self {
        let authenticator = test_authenticator(token_ttl);

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&authenticator),
        ));
        let task_service: Arc<dyn TaskServicePort> =
            Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::new())));

        Self::serve(auth_service, task_service, authenticator, None).await
    }

    /// Spawn the application against a fresh Postgres database.
    ///
    /// Returns `None` when `DATABASE_URL` is not set, so callers can skip.
    pub async fn spawn_postgres() -> Option<Self> {
        let db = TestDb::new().await?;
        let authenticator = test_authenticator(chrono::Duration::minutes(60));

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            Arc::new(PostgresUserRepository::new(db.pool.clone())),
            Arc::clone(&authenticator),
        ));
        let task_service: Arc<dyn TaskServicePort> = Arc::new(TaskService::new(Arc::new(
            PostgresTaskRepository::new(db.pool.clone()),
        )));

        Some(Self::serve(auth_service, task_service, authenticator, Some(db)).await)
    }

    async fn serve(
        auth_service: Arc<dyn AuthServicePort>,
        task_service: Arc<dyn TaskServicePort>,
        authenticator: Arc<Authenticator>,
        db: Option<TestDb>,
    ) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(auth_service, task_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            db,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Create an account and return the token issued by sign-up
    pub async fn sign_up(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/signup")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Create a task and return its JSON representation
    pub async fn create_task(&self, token: &str, body: Value) -> Value {
        let response = self
            .post_authenticated("/tasks", token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

fn test_authenticator(token_ttl: chrono::Duration) -> Arc<Authenticator> {
    // Cheap Argon2 parameters keep the suite fast
    let hasher = PasswordHasher::with_cost(1024, 1, 1).expect("Invalid test hasher cost");
    Arc::new(
        Authenticator::new(TEST_JWT_SECRET, token_ttl, hasher)
            .expect("Failed to create authenticator"),
    )
}

impl TestDb {
    /// Create a new test database with a unique name, or `None` when
    /// `DATABASE_URL` is not set
    pub async fn new() -> Option<Self> {
        let admin_url = std::env::var("DATABASE_URL").ok()?;
        let db_name = format!(
            "test_task_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
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
            admin_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
