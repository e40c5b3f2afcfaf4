use chrono::Utc;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::quote::form::{lenient_f64, QuoteForm};
use crate::services::quote_service::QuoteEstimate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuoteStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Enviada")]
    Sent,
    #[serde(rename = "Aprobada")]
    Approved,
    #[serde(rename = "Rechazada")]
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "Pendiente",
            QuoteStatus::Sent => "Enviada",
            QuoteStatus::Approved => "Aprobada",
            QuoteStatus::Rejected => "Rechazada",
        }
    }
}

/// A saved quote. `snapshot` holds the complete estimate as computed; the
/// other fields are denormalized from it for listing and searching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quote_number: String,
    pub client_id: Option<String>,
    pub client_name: String,
    pub origin: String,
    pub destination: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub passenger_count: u32,
    pub total_amount: f64,
    pub status: QuoteStatus,
    pub snapshot: QuoteEstimate,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Stored timestamp, truncated to milliseconds.
pub fn stored_time(at: chrono::DateTime<Utc>) -> DateTime {
    DateTime::from_millis(at.timestamp_millis())
}

/// Body of `POST /api/quotes` and `PUT /api/quotes/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuoteRequest {
    #[serde(flatten)]
    pub form: QuoteForm,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Price agreed with the client, overriding the computed total when positive.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub agreed_amount: f64,
    #[serde(default)]
    pub status: Option<QuoteStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: QuoteStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::distance_service::SegmentDistanceSource;
    use crate::services::quote_service::QuoteService;

    fn sample_estimate() -> QuoteEstimate {
        let form: QuoteForm = serde_json::from_value(serde_json::json!({
            "itinerary": [{ "destinations": ["CDMX", "Puebla"] }],
            "config": { "fuelPricePerLiter": 27, "fuelEfficiencyKmPerLiter": 7 }
        }))
        .unwrap();
        QuoteService::estimate(&form, &SegmentDistanceSource::default(), None).unwrap()
    }

    #[test]
    fn test_status_uses_business_names() {
        assert_eq!(
            serde_json::to_string(&QuoteStatus::Approved).unwrap(),
            "\"Aprobada\""
        );
        let status: QuoteStatus = serde_json::from_str("\"Enviada\"").unwrap();
        assert_eq!(status, QuoteStatus::Sent);
        assert_eq!(QuoteStatus::default().as_str(), "Pendiente");
    }

    #[test]
    fn test_timestamps_are_stored_as_bson_dates() {
        use chrono::TimeZone;
        use mongodb::bson::{self, Bson};

        let on_the_second = Utc.with_ymd_and_hms(2025, 6, 10, 15, 0, 0).unwrap();
        let half_second_later = on_the_second + chrono::Duration::milliseconds(500);
        let earlier = stored_time(on_the_second);
        let later = stored_time(half_second_later);
        assert!(later > earlier);

        let record = QuoteRecord {
            id: None,
            quote_number: "COT-20250610-AB12".to_string(),
            client_id: None,
            client_name: "Viajes del Sur".to_string(),
            origin: "CDMX".to_string(),
            destination: "Puebla".to_string(),
            start_date: None,
            end_date: None,
            passenger_count: 8,
            total_amount: 11914.29,
            status: QuoteStatus::Pending,
            snapshot: sample_estimate(),
            created_at: earlier,
            updated_at: later,
        };

        let document = bson::to_document(&record).unwrap();
        assert_eq!(document.get("created_at"), Some(&Bson::DateTime(earlier)));
        assert_eq!(document.get("updated_at"), Some(&Bson::DateTime(later)));

        let restored: QuoteRecord = bson::from_document(document).unwrap();
        assert_eq!(restored.created_at.timestamp_millis(), on_the_second.timestamp_millis());
        assert_eq!(restored.updated_at.timestamp_millis(), half_second_later.timestamp_millis());
    }

    #[test]
    fn test_save_request_reads_flattened_form() {
        let request: SaveQuoteRequest = serde_json::from_value(serde_json::json!({
            "clientName": "Viajes del Sur",
            "clientId": "42",
            "agreedAmount": "12,000",
            "itinerary": [{ "destinations": ["CDMX", "Puebla"] }]
        }))
        .unwrap();

        assert_eq!(request.form.client_name(), "Viajes del Sur");
        assert_eq!(request.client_id.as_deref(), Some("42"));
        // Only the leading number is read, as the admin panel does.
        assert_eq!(request.agreed_amount, 12.0);
        assert_eq!(request.form.itinerary.len(), 1);
        assert!(request.status.is_none());
    }
}
