use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use mongodb::Client;
use std::sync::Arc;

use transit_quotes_api::{config::AppConfig, routes};

pub struct TestApp {
    pub client: Arc<Client>,
    pub config: AppConfig,
}

impl TestApp {
    /// The client connects lazily, so routes that never reach the store
    /// work without a running MongoDB.
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = Client::with_uri_str(&mongo_uri)
            .await
            .expect("MongoDB URI should parse");

        Self {
            client: Arc::new(client),
            config: AppConfig::local(&mongo_uri),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(self.config.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

pub fn reference_quote() -> serde_json::Value {
    serde_json::json!({
        "clientName": "Grupo Escolar Tlaloc",
        "itinerary": [
            { "date": "2025-08-01", "destinations": ["CDMX", "Puebla"] },
            { "date": "2025-08-02", "destinations": ["Puebla", "Cholula"] },
            { "date": "2025-08-03", "destinations": ["Cholula", "CDMX"] }
        ],
        "distance": { "oneWayKm": 300, "adjustedOneWayKm": "", "extraKm": "" },
        "daysNights": { "days": "3", "nights": "2" },
        "config": {
            "fuelPricePerLiter": "27",
            "fuelEfficiencyKmPerLiter": "7",
            "tollsOneWay": "1110",
            "driverPercentage": "20",
            "accommodationPerNight": "450",
            "pensionPerDay": "0",
            "busOneWayPrice": "0",
            "includeBus": false,
            "airportFee": "538",
            "includeAirportFee": false,
            "returnVehicleEmpty": false,
            "dailyRate": { "2": "800", "8": "1800", "14": "3000", "20": "5700" }
        }
    })
}
