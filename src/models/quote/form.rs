//! Raw quote input as the admin panel posts it.
//!
//! Form fields arrive as numbers, numeric strings, blanks or nulls. They are
//! coerced exactly once, here: strings contribute their leading number
//! (`"300 km"` is 300) and anything without one becomes `0` (or `false`), so
//! a blank "extra km" box means zero kilometres.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{
    CostConfiguration, DailyRates, DayPlan, DaysNights, DistanceEstimate, Itinerary,
    ManualAdjustment, VehicleClass,
};

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_f64).unwrap_or(0.0))
}

pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_bool).unwrap_or(false))
}

fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(s.trim()).parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Longest leading `[+-]digits[.digits][e[+-]digits]` run of `s`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = usize::from(matches!(bytes.first().copied(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut mantissa_digits = integer_end - end;
    end = integer_end;
    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        mantissa_digits += fraction_end - end - 1;
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end).copied(), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent).copied(), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }
    &s[..end]
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Whole count from a coerced form value, truncating fractions like `parseInt`.
fn whole(value: f64) -> u32 {
    if value >= 1.0 {
        value.trunc().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub destinations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesForm {
    #[serde(rename = "2", default, deserialize_with = "lenient_f64")]
    pub two: f64,
    #[serde(rename = "8", default, deserialize_with = "lenient_f64")]
    pub eight: f64,
    #[serde(rename = "14", default, deserialize_with = "lenient_f64")]
    pub fourteen: f64,
    #[serde(rename = "20", default, deserialize_with = "lenient_f64")]
    pub twenty: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostForm {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fuel_price_per_liter: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fuel_efficiency_km_per_liter: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tolls_one_way: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub driver_percentage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub accommodation_per_night: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pension_per_day: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bus_one_way_price: f64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub include_bus: bool,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub airport_fee: f64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub include_airport_fee: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub return_vehicle_empty: bool,
    #[serde(default)]
    pub daily_rate: RatesForm,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceForm {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub one_way_km: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub adjusted_one_way_km: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub extra_km: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaysNightsForm {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub days: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub nights: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteForm {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub itinerary: Vec<DayForm>,
    #[serde(default)]
    pub distance: DistanceForm,
    #[serde(default)]
    pub days_nights: DaysNightsForm,
    #[serde(default)]
    pub config: CostForm,
    /// Indices into the class order; `None` selects every class.
    #[serde(default)]
    pub selected_vehicles: Option<Vec<usize>>,
}

impl QuoteForm {
    /// Blank form pre-filled with the given cost defaults and one empty day.
    pub fn with_defaults(config: CostForm) -> Self {
        Self {
            itinerary: vec![DayForm {
                date: None,
                destinations: vec![String::new(), String::new()],
            }],
            config,
            ..Default::default()
        }
    }

    pub fn itinerary(&self) -> Itinerary {
        Itinerary::new(
            self.itinerary
                .iter()
                .map(|day| DayPlan {
                    date: day
                        .date
                        .as_deref()
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(str::to_string),
                    destinations: day.destinations.iter().map(|d| d.trim().to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn distance(&self) -> DistanceEstimate {
        DistanceEstimate {
            one_way_km: self.distance.one_way_km,
            adjustment: ManualAdjustment {
                adjusted_one_way_km: self.distance.adjusted_one_way_km,
                extra_km: self.distance.extra_km,
            },
        }
    }

    /// Days default to the itinerary length (at least one); nights that are
    /// missing or zero fall back to one less than the days.
    pub fn days_nights(&self) -> DaysNights {
        let days = match whole(self.days_nights.days) {
            0 => (self.itinerary.len() as u32).max(1),
            days => days,
        };
        match whole(self.days_nights.nights) {
            0 => DaysNights::from_days(days),
            nights => DaysNights { days, nights },
        }
    }

    pub fn cost_configuration(&self) -> CostConfiguration {
        let costs = &self.config;
        CostConfiguration {
            fuel_price_per_liter: costs.fuel_price_per_liter,
            fuel_efficiency_km_per_liter: costs.fuel_efficiency_km_per_liter,
            tolls_one_way: costs.tolls_one_way,
            driver_percentage: costs.driver_percentage,
            accommodation_per_night: costs.accommodation_per_night,
            pension_per_day: costs.pension_per_day,
            bus_one_way_price: costs.bus_one_way_price,
            include_bus: costs.include_bus,
            airport_fee: costs.airport_fee,
            include_airport_fee: costs.include_airport_fee,
            return_vehicle_empty: costs.return_vehicle_empty,
            daily_rate: DailyRates {
                two: costs.daily_rate.two,
                eight: costs.daily_rate.eight,
                fourteen: costs.daily_rate.fourteen,
                twenty: costs.daily_rate.twenty,
            },
        }
    }

    /// Selected classes in class order. Out-of-range indices are ignored.
    pub fn selection(&self) -> Vec<VehicleClass> {
        match &self.selected_vehicles {
            None => VehicleClass::ALL.to_vec(),
            Some(indices) => VehicleClass::ALL
                .iter()
                .copied()
                .filter(|class| indices.contains(&class.index()))
                .collect(),
        }
    }

    pub fn client_name(&self) -> &str {
        self.client_name.as_deref().map(str::trim).unwrap_or("")
    }
}
