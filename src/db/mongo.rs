use log::{info, warn};
use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, QUOTES_COLLECTION};
use crate::models::quote_record::QuoteRecord;

pub async fn create_mongo_client(uri: &str) -> mongodb::error::Result<Arc<Client>> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Server API v1 needs MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // The client connects lazily; a failed ping is not fatal.
    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            warn!("Connected to MongoDB but ping test failed: {}", e);
            warn!("The API may still work, but saved quotes might be unavailable");
        }
    }

    Ok(Arc::new(client))
}

pub fn quotes(client: &Client, config: &AppConfig) -> Collection<QuoteRecord> {
    client
        .database(&config.database)
        .collection(QUOTES_COLLECTION)
}
