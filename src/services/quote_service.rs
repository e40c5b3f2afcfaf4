use chrono::{DateTime, Utc};
use log::debug;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::quote::{
    form::QuoteForm, CostConfiguration, DaysNights, DistanceEstimate, Itinerary, QuoteResult,
    VehicleClass,
};
use crate::models::quote_record::{stored_time, QuoteRecord, QuoteStatus, SaveQuoteRequest};
use crate::services::distance_service::{normalize, DistanceSource};
use crate::services::pricing_service::PricingService;
use crate::services::summary_service::{customer_text, internal_text, SummaryContext};

/// Everything a quote was computed from and everything it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEstimate {
    pub client_name: String,
    pub itinerary: Itinerary,
    pub distance: DistanceEstimate,
    pub days_nights: DaysNights,
    pub config: CostConfiguration,
    pub selected_vehicles: Vec<VehicleClass>,
    pub result: QuoteResult,
    pub whatsapp_client: String,
    pub whatsapp_internal: String,
}

pub struct QuoteService;

impl QuoteService {
    /// Sanitize the form, price the trip and render both texts.
    ///
    /// When the form carries no one-way distance, `source` estimates it from
    /// the itinerary.
    pub fn estimate(
        form: &QuoteForm,
        source: &dyn DistanceSource,
        generated_at: Option<DateTime<Utc>>,
    ) -> Result<QuoteEstimate> {
        let itinerary = form.itinerary();
        let destinations = itinerary.destinations()?;

        let mut distance = form.distance();
        if !(distance.one_way_km > 0.0) {
            distance.one_way_km = source.one_way_km(&destinations);
            debug!(
                "Estimated {} km one way for {} destinations",
                distance.one_way_km,
                destinations.len()
            );
        }

        let config = form.cost_configuration();
        let days_nights = form.days_nights();
        let normalized = normalize(&distance, config.return_vehicle_empty);
        let result = PricingService::compute(&normalized, days_nights, &config)?;

        let selected_vehicles = form.selection();
        let client_name = form.client_name().to_string();
        let ctx = SummaryContext {
            itinerary: &itinerary,
            result: &result,
            config: &config,
            schedule: days_nights,
            client_name: &client_name,
            selection: &selected_vehicles,
            generated_at,
        };
        let whatsapp_client = customer_text(&ctx)?;
        let whatsapp_internal = internal_text(&ctx)?;

        Ok(QuoteEstimate {
            client_name,
            itinerary,
            distance,
            days_nights,
            config,
            selected_vehicles,
            result,
            whatsapp_client,
            whatsapp_internal,
        })
    }

    /// Build a new record from a freshly computed estimate.
    pub fn new_record(
        request: &SaveQuoteRequest,
        estimate: QuoteEstimate,
        now: DateTime<Utc>,
    ) -> QuoteRecord {
        let first = estimate
            .selected_vehicles
            .first()
            .map(|class| *estimate.result.breakdown(*class));
        let total_amount = if request.agreed_amount > 0.0 {
            request.agreed_amount
        } else {
            first.map(|quote| quote.costs.total).unwrap_or(0.0)
        };
        let itinerary = &estimate.itinerary;

        QuoteRecord {
            id: None,
            quote_number: Self::quote_number(now),
            client_id: request
                .client_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            client_name: estimate.client_name.clone(),
            origin: itinerary.first_stop().unwrap_or_default().to_string(),
            destination: itinerary.last_stop().unwrap_or_default().to_string(),
            start_date: itinerary.first_date().map(str::to_string),
            end_date: itinerary.last_date().map(str::to_string),
            passenger_count: first.map(|quote| quote.capacity).unwrap_or(0),
            total_amount,
            status: request.status.unwrap_or_default(),
            snapshot: estimate,
            created_at: stored_time(now),
            updated_at: stored_time(now),
        }
    }

    /// Rebuild a stored record from a new estimate, keeping its identity,
    /// number and creation time. The status only changes when one is given.
    pub fn updated_record(
        existing: &QuoteRecord,
        request: &SaveQuoteRequest,
        estimate: QuoteEstimate,
        now: DateTime<Utc>,
    ) -> QuoteRecord {
        let status: QuoteStatus = request.status.unwrap_or(existing.status);
        QuoteRecord {
            id: existing.id,
            quote_number: existing.quote_number.clone(),
            status,
            created_at: existing.created_at,
            ..Self::new_record(request, estimate, now)
        }
    }

    /// `COT-20250610-7QXA`
    pub fn quote_number(now: DateTime<Utc>) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(4)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();
        format!("COT-{}-{}", now.format("%Y%m%d"), suffix)
    }
}
