use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::{
    configuration::{DatabaseSettings, Settings},
    email_client::EmailClient,
    notification,
    routes::ApiKey,
    run,
    store::{PostgresWaitlistStore, WaitlistStore},
    waitlist::Waitlist,
};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let store = Arc::new(PostgresWaitlistStore::new(get_connection_pool(
            &config.database,
        )));

        Self::build_with_store(config, store)
    }

    /// Wires the server around an already constructed store.
    pub fn build_with_store(
        config: Settings,
        store: Arc<dyn WaitlistStore>,
    ) -> Result<Self, anyhow::Error> {
        let timeout = config.email.timeout();
        let email_client = EmailClient::new(
            config.email.base_url,
            config.email.sender,
            config.email.recipient,
            config.email.token,
            timeout,
        );
        let templates =
            notification::templates().context("Failed to load notification templates")?;
        let waitlist = Waitlist::new(store, Arc::new(email_client), templates);

        let address = (config.application.host, config.application.port);
        let listener = TcpListener::bind(address).context("Failed to bind the listener")?;
        let port = listener.local_addr()?.port();
        tracing::info!(port, "Listening for waitlist submissions");

        let server = run(listener, waitlist, ApiKey(config.application.api_key))?;

        Ok(Self { port, server })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.with_db())
}
