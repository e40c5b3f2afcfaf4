use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use transit_quotes_api::{config::AppConfig, db, routes};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let client = db::mongo::create_mongo_client(&config.mongo_uri)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    info!("MongoDB client ready");

    let bind = (config.host.clone(), config.port);
    info!("Starting HTTP server on {}:{}", bind.0, bind.1);

    let config = web::Data::new(config);
    let client = web::Data::new(client);

    HttpServer::new(move || {
        let cors = match &config.allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(client.clone())
            .app_data(config.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
