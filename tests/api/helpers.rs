use std::sync::Arc;

use once_cell::sync::Lazy;
use secrecy::Secret;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use waitlist::{
    configuration::{DatabaseSettings, Settings},
    domain::{WaitlistEmail, WaitlistEntry},
    startup::{get_connection_pool, Application},
    store::{InMemoryWaitlistStore, WaitlistStore},
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

pub const API_KEY: &str = "test-anon-key";

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryWaitlistStore>,
    pub email_server: MockServer,
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test".to_string();
    let level = "debug".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub fn test_config(email_server: &MockServer) -> Settings {
    let mut config = Settings::get().expect("Failed to read configuration");
    config.application.port = 0;
    config.application.api_key = Some(Secret::new(API_KEY.to_string()));
    config.email.base_url = email_server.uri();
    config.email.timeout_milliseconds = 200;
    config
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;
    let store = Arc::new(InMemoryWaitlistStore::new());

    let app = Application::build_with_store(test_config(&email_server), store.clone())
        .expect("Failed to build app.");

    tokio::spawn(app.server);

    TestApp {
        address: format!("http://127.0.0.1:{}", app.port),
        store,
        email_server,
    }
}

impl TestApp {
    pub async fn submit_email(&self, body: serde_json::Value) -> reqwest::Response {
        self.submit_raw(body.to_string()).await
    }

    pub async fn submit_raw(&self, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/submit-email", self.address))
            .header("Content-Type", "application/json")
            .bearer_auth(API_KEY)
            .body(body)
            .send()
            .await
            .expect("Could not send request")
    }

    pub async fn preflight(&self) -> reqwest::Response {
        reqwest::Client::new()
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/submit-email", self.address),
            )
            .header("Origin", "https://knowperiod.example")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Could not send request")
    }

    pub async fn healthcheck(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/healthz", self.address))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn entry(&self, email: &str) -> Option<WaitlistEntry> {
        let email = WaitlistEmail::parse(email.to_string()).expect("Invalid test email");
        self.store
            .find(&email)
            .await
            .expect("Failed to query the store")
    }
}

/// Creates a fresh, migrated database named after a random uuid.
pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let connection = PgPoolOptions::new()
        .connect_with(config.without_db())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = get_connection_pool(config);

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
