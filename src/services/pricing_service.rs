use crate::error::{QuoteError, Result};
use crate::models::quote::{
    CostBreakdown, CostConfiguration, DaysNights, QuoteResult, VehicleClass, VehicleQuote,
};
use crate::services::distance_service::NormalizedDistance;

pub struct PricingService;

impl PricingService {
    /// Price the trip for every vehicle class, in class order.
    ///
    /// Refuses to run on a non-positive fuel efficiency or distance, and
    /// rejects any class whose total overflows. No rounding is applied.
    pub fn compute(
        distance: &NormalizedDistance,
        schedule: DaysNights,
        config: &CostConfiguration,
    ) -> Result<QuoteResult> {
        Self::validate(distance.total_km, schedule, config)?;

        let breakdowns = VehicleClass::ALL.map(|class| VehicleQuote {
            vehicle_type: class,
            capacity: class.capacity(),
            costs: Self::breakdown(class, distance.total_km, schedule, config),
        });
        if let Some(quote) = breakdowns.iter().find(|quote| !quote.costs.total.is_finite()) {
            return Err(QuoteError::InvalidConfiguration(format!(
                "cost for {} is out of range",
                quote.vehicle_type.label()
            )));
        }

        Ok(QuoteResult {
            days: schedule.days,
            total_round_trip_km: distance.total_km,
            base_round_trip_km: distance.base_round_trip_km,
            extra_km: distance.extra_km,
            breakdowns,
        })
    }

    fn validate(total_km: f64, schedule: DaysNights, config: &CostConfiguration) -> Result<()> {
        if !(config.fuel_efficiency_km_per_liter > 0.0) {
            return Err(QuoteError::InvalidConfiguration(
                "fuel efficiency must be greater than zero".to_string(),
            ));
        }
        if !(total_km > 0.0) || !total_km.is_finite() {
            return Err(QuoteError::InvalidConfiguration(
                "total distance must be greater than zero".to_string(),
            ));
        }
        if schedule.days == 0 {
            return Err(QuoteError::InvalidConfiguration(
                "a trip lasts at least one day".to_string(),
            ));
        }
        Ok(())
    }

    /// Distance-driven cost; the same for every vehicle class.
    pub fn fuel_cost(total_km: f64, config: &CostConfiguration) -> f64 {
        (total_km / config.fuel_efficiency_km_per_liter) * config.fuel_price_per_liter
    }

    /// Tolls are paid for the working round trip only, even when the vehicle
    /// also drives back empty.
    pub fn tolls_cost(config: &CostConfiguration) -> f64 {
        config.tolls_one_way * 2.0
    }

    pub fn breakdown(
        class: VehicleClass,
        total_km: f64,
        schedule: DaysNights,
        config: &CostConfiguration,
    ) -> CostBreakdown {
        let days = schedule.days as f64;
        let nights = schedule.nights as f64;

        let fuel = Self::fuel_cost(total_km, config);
        let tolls = Self::tolls_cost(config);
        let accommodation = config.accommodation_per_night * nights;
        let pension = config.pension_per_day * days;
        let vehicle_rental = config.daily_rate.rate(class) * days;
        let driver = vehicle_rental * (config.driver_percentage / 100.0);
        let bus = if config.include_bus {
            config.bus_one_way_price * 2.0
        } else {
            0.0
        };
        let airport_fee = if config.include_airport_fee {
            config.airport_fee
        } else {
            0.0
        };

        CostBreakdown {
            fuel,
            tolls,
            accommodation,
            pension,
            vehicle_rental,
            driver,
            bus,
            airport_fee,
            total: fuel
                + tolls
                + accommodation
                + pension
                + vehicle_rental
                + driver
                + bus
                + airport_fee,
        }
    }
}
