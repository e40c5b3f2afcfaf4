pub mod form;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

/// The four passenger-capacity tiers every quote is priced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "14")]
    Fourteen,
    #[serde(rename = "20")]
    Twenty,
}

impl VehicleClass {
    /// Pricing and display order.
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Two,
        VehicleClass::Eight,
        VehicleClass::Fourteen,
        VehicleClass::Twenty,
    ];

    pub fn capacity(self) -> u32 {
        match self {
            VehicleClass::Two => 2,
            VehicleClass::Eight => 8,
            VehicleClass::Fourteen => 14,
            VehicleClass::Twenty => 20,
        }
    }

    pub fn index(self) -> usize {
        match self {
            VehicleClass::Two => 0,
            VehicleClass::Eight => 1,
            VehicleClass::Fourteen => 2,
            VehicleClass::Twenty => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name used on printed quotes, e.g. `UNIDAD DE 14`.
    pub fn label(self) -> String {
        format!("UNIDAD DE {}", self.capacity())
    }
}

/// Daily rental rate per vehicle class, keyed by capacity on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyRates {
    #[serde(rename = "2")]
    pub two: f64,
    #[serde(rename = "8")]
    pub eight: f64,
    #[serde(rename = "14")]
    pub fourteen: f64,
    #[serde(rename = "20")]
    pub twenty: f64,
}

impl DailyRates {
    pub fn rate(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Two => self.two,
            VehicleClass::Eight => self.eight,
            VehicleClass::Fourteen => self.fourteen,
            VehicleClass::Twenty => self.twenty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConfiguration {
    pub fuel_price_per_liter: f64,
    pub fuel_efficiency_km_per_liter: f64,
    pub tolls_one_way: f64,
    /// Percentage (0-100) of the vehicle rental paid to the driver.
    pub driver_percentage: f64,
    pub accommodation_per_night: f64,
    pub pension_per_day: f64,
    pub bus_one_way_price: f64,
    pub include_bus: bool,
    pub airport_fee: f64,
    pub include_airport_fee: bool,
    /// Dead-head return: the vehicle drives back empty, doubling the distance.
    pub return_vehicle_empty: bool,
    pub daily_rate: DailyRates,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: Option<String>,
    pub destinations: Vec<String>,
}

impl DayPlan {
    /// Trimmed, non-blank destinations in visiting order.
    pub fn stops(&self) -> impl Iterator<Item = &str> {
        self.destinations
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    pub days: Vec<DayPlan>,
}

impl Itinerary {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self { days }
    }

    pub fn stops(&self) -> impl Iterator<Item = &str> {
        self.days.iter().flat_map(|day| day.stops())
    }

    /// Flattened destination list, required before any distance is computed.
    pub fn destinations(&self) -> Result<Vec<String>> {
        let destinations: Vec<String> = self.stops().map(str::to_string).collect();
        if destinations.len() < 2 {
            return Err(QuoteError::InsufficientDestinations {
                found: destinations.len(),
            });
        }
        Ok(destinations)
    }

    pub fn first_stop(&self) -> Option<&str> {
        self.days.first().and_then(|day| day.stops().next())
    }

    pub fn last_stop(&self) -> Option<&str> {
        self.days.last().and_then(|day| day.stops().last())
    }

    pub fn first_date(&self) -> Option<&str> {
        self.days.first().and_then(|day| day.date.as_deref())
    }

    pub fn last_date(&self) -> Option<&str> {
        self.days.last().and_then(|day| day.date.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAdjustment {
    /// Replaces the estimated one-way distance when positive.
    pub adjusted_one_way_km: f64,
    /// Detours the distance source does not know about.
    pub extra_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceEstimate {
    pub one_way_km: f64,
    #[serde(flatten)]
    pub adjustment: ManualAdjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysNights {
    pub days: u32,
    pub nights: u32,
}

impl DaysNights {
    /// One night less than the number of days.
    pub fn from_days(days: u32) -> Self {
        Self {
            days,
            nights: days.saturating_sub(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub fuel: f64,
    pub tolls: f64,
    pub accommodation: f64,
    pub pension: f64,
    pub vehicle_rental: f64,
    pub driver: f64,
    pub bus: f64,
    pub airport_fee: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleQuote {
    pub vehicle_type: VehicleClass,
    pub capacity: u32,
    pub costs: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub days: u32,
    pub total_round_trip_km: f64,
    pub base_round_trip_km: f64,
    pub extra_km: f64,
    pub breakdowns: [VehicleQuote; 4],
}

impl QuoteResult {
    pub fn breakdown(&self, class: VehicleClass) -> &VehicleQuote {
        &self.breakdowns[class.index()]
    }

    /// Breakdowns for the selected classes, kept in class order.
    pub fn selected<'a>(
        &'a self,
        selection: &'a [VehicleClass],
    ) -> impl Iterator<Item = &'a VehicleQuote> + 'a {
        self.breakdowns
            .iter()
            .filter(move |quote| selection.contains(&quote.vehicle_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: Option<&str>, destinations: &[&str]) -> DayPlan {
        DayPlan {
            date: date.map(str::to_string),
            destinations: destinations.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_vehicle_classes_are_ordered_by_capacity() {
        let capacities: Vec<u32> = VehicleClass::ALL.iter().map(|c| c.capacity()).collect();
        assert_eq!(capacities, vec![2, 8, 14, 20]);

        for (index, class) in VehicleClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), index);
            assert_eq!(VehicleClass::from_index(index), Some(*class));
        }
        assert_eq!(VehicleClass::from_index(4), None);
        assert_eq!(VehicleClass::Fourteen.label(), "UNIDAD DE 14");
    }

    #[test]
    fn test_vehicle_class_serializes_as_capacity() {
        assert_eq!(serde_json::to_string(&VehicleClass::Eight).unwrap(), "\"8\"");
        let parsed: VehicleClass = serde_json::from_str("\"20\"").unwrap();
        assert_eq!(parsed, VehicleClass::Twenty);
    }

    #[test]
    fn test_daily_rates_use_capacity_keys() {
        let rates: DailyRates =
            serde_json::from_str(r#"{"2": 800, "8": 1800, "14": 3000, "20": 5700}"#).unwrap();
        assert_eq!(rates.rate(VehicleClass::Two), 800.0);
        assert_eq!(rates.rate(VehicleClass::Eight), 1800.0);
        assert_eq!(rates.rate(VehicleClass::Fourteen), 3000.0);
        assert_eq!(rates.rate(VehicleClass::Twenty), 5700.0);
    }

    #[test]
    fn test_destinations_skip_blank_entries_across_days() {
        let itinerary = Itinerary::new(vec![
            day(Some("2025-03-01"), &[" Puebla ", ""]),
            day(None, &["   ", "Oaxaca", "Mitla"]),
        ]);

        assert_eq!(
            itinerary.destinations().unwrap(),
            vec!["Puebla", "Oaxaca", "Mitla"]
        );
        assert_eq!(itinerary.first_stop(), Some("Puebla"));
        assert_eq!(itinerary.last_stop(), Some("Mitla"));
        assert_eq!(itinerary.first_date(), Some("2025-03-01"));
        assert_eq!(itinerary.last_date(), None);
    }

    #[test]
    fn test_destinations_require_two_stops() {
        let empty = Itinerary::default();
        assert_eq!(
            empty.destinations(),
            Err(QuoteError::InsufficientDestinations { found: 0 })
        );

        let single = Itinerary::new(vec![day(None, &["CDMX", "  "])]);
        assert_eq!(
            single.destinations(),
            Err(QuoteError::InsufficientDestinations { found: 1 })
        );
    }

    #[test]
    fn test_nights_default_to_one_less_than_days() {
        assert_eq!(DaysNights::from_days(3), DaysNights { days: 3, nights: 2 });
        assert_eq!(DaysNights::from_days(1), DaysNights { days: 1, nights: 0 });
        assert_eq!(DaysNights::from_days(0), DaysNights { days: 0, nights: 0 });
    }
}
