use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};
use thiserror::Error;

use crate::models::quote::form::{CostForm, RatesForm};
use crate::services::distance_service::DEFAULT_KM_PER_SEGMENT;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "Transport";
pub const QUOTES_COLLECTION: &str = "Quotes";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub allowed_origin: Option<String>,
    pub km_per_segment: f64,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mongo_uri = env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: try_load("PORT", PORT),
            mongo_uri,
            database: env::var("QUOTES_DATABASE").unwrap_or_else(|_| DATABASE.to_string()),
            allowed_origin: env::var("ALLOWED_ORIGIN").ok().filter(|o| !o.trim().is_empty()),
            km_per_segment: try_load("KM_PER_SEGMENT", DEFAULT_KM_PER_SEGMENT),
            environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Settings for tests and local tooling; nothing is read from the environment.
    pub fn local(mongo_uri: &str) -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongo_uri: mongo_uri.to_string(),
            database: DATABASE.to_string(),
            allowed_origin: None,
            km_per_segment: DEFAULT_KM_PER_SEGMENT,
            environment: "test".to_string(),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?} ({e}), using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// Cost values a new quote starts from.
pub fn default_costs() -> CostForm {
    CostForm {
        fuel_price_per_liter: 27.0,
        fuel_efficiency_km_per_liter: 7.0,
        tolls_one_way: 1110.0,
        driver_percentage: 20.0,
        accommodation_per_night: 450.0,
        pension_per_day: 0.0,
        bus_one_way_price: 0.0,
        include_bus: false,
        airport_fee: 538.0,
        include_airport_fee: false,
        return_vehicle_empty: false,
        daily_rate: RatesForm {
            two: 800.0,
            eight: 1800.0,
            fourteen: 3000.0,
            twenty: 5700.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_costs_are_priceable() {
        let costs = default_costs();
        assert!(costs.fuel_efficiency_km_per_liter > 0.0);
        assert_eq!(costs.daily_rate.eight, 1800.0);
        assert!(!costs.include_bus && !costs.include_airport_fee && !costs.return_vehicle_empty);
    }

    #[test]
    fn test_local_config_defaults() {
        let config = AppConfig::local("mongodb://localhost:27017");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, "Transport");
        assert_eq!(config.km_per_segment, 100.0);
        assert!(config.allowed_origin.is_none());
    }
}
