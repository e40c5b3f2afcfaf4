use actix_web::{web, HttpResponse, Responder};
use log::error;
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    client: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client, &config).await;
    if mongo_result.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("mongodb".to_string(), mongo_result);

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &Client, config: &AppConfig) -> ServiceStatus {
    match client
        .database(&config.database)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Connected to MongoDB database '{}'", config.database)),
        },
        Err(e) => {
            error!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}
