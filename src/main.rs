use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    configuration::ConfigurationHandler, database_gateway::DatabaseGateway, http::create_app,
    local_gateway::LocalGateway, notifier::LoggingNotifier,
};

mod availability;
mod booking;
mod configuration;
mod conflicts;
mod database_gateway;
mod error;
mod gateway;
mod http;
mod local_gateway;
mod notifier;
mod query;
mod schema;
mod slots;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Clone)]
struct AppState<G, N> {
    gateway: G,
    notifier: N,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap();
    info!("Accessible at {address}");

    let notifier = LoggingNotifier;
    let app = if let Some(database_url) = configuration.database_url() {
        let gateway = loop {
            match DatabaseGateway::new(&database_url) {
                Ok(gateway) => {
                    info!("Successfully connected to database");
                    break gateway;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection. Retry in 1 sec. You may want to restart without --database-url (impersistent sessions).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(AppState { gateway, notifier })
    } else {
        let gateway = LocalGateway::default();
        gateway.insert_example_tutors();
        create_app(AppState { gateway, notifier })
    };

    axum::serve(listener, app).await.unwrap();
}
