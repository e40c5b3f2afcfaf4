//! WhatsApp-ready quote texts: one for the customer, one for operations.

use chrono::{DateTime, Utc};

use crate::error::{QuoteError, Result};
use crate::models::quote::{CostConfiguration, DaysNights, Itinerary, QuoteResult, VehicleClass};

pub struct SummaryContext<'a> {
    pub itinerary: &'a Itinerary,
    pub result: &'a QuoteResult,
    pub config: &'a CostConfiguration,
    pub schedule: DaysNights,
    pub client_name: &'a str,
    pub selection: &'a [VehicleClass],
    /// Adds a "generated" footer when set.
    pub generated_at: Option<DateTime<Utc>>,
}

impl SummaryContext<'_> {
    fn client(&self) -> &str {
        match self.client_name.trim() {
            "" => "Por definir",
            name => name,
        }
    }

    fn itinerary_lines(&self, missing_date: &str) -> String {
        self.itinerary
            .days
            .iter()
            .enumerate()
            .map(|(index, day)| {
                let date = day
                    .date
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .unwrap_or(missing_date);
                let stops: Vec<&str> = day.stops().collect();
                format!("Día {} ({}): {}", index + 1, date, stops.join(" → "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn footer(&self) -> String {
        match self.generated_at {
            Some(at) => format!("\n\nGenerado: {}", at.format("%Y-%m-%d %H:%M UTC")),
            None => String::new(),
        }
    }

    fn ensure_selection(&self) -> Result<()> {
        if self.result.selected(self.selection).next().is_none() {
            return Err(QuoteError::EmptySelection);
        }
        Ok(())
    }
}

/// `1234567.891` → `1,234,567.89`
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

fn plural(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Short message for the client: itinerary, one total per selected class and
/// the services every quote includes.
pub fn customer_text(ctx: &SummaryContext) -> Result<String> {
    ctx.ensure_selection()?;

    let quotes = ctx
        .result
        .selected(ctx.selection)
        .map(|quote| {
            format!(
                "{} ({} pasajeros): *${}*",
                quote.vehicle_type.label(),
                quote.capacity,
                format_money(quote.costs.total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let days = ctx.result.days;
    let mut text = format!(
        "🚐 *COTIZACIÓN DE VIAJE*\n\n\
         👤 Cliente: {client}\n\n\
         📍 *ITINERARIO*\n{itinerary}\n\n\
         💰 *COTIZACIONES DISPONIBLES*\n{quotes}\n\n\
         📅 Duración: {duration}\n\n\
         ✅ Incluye:\n\
         • Gasolina ida y regreso\n\
         • Casetas ida y regreso\n\
         • Operador\n\
         • Seguro de viajero\n\n\
         📱 ¿Tienes preguntas? Contáctanos",
        client = ctx.client(),
        itinerary = ctx.itinerary_lines("Fecha por definir"),
        quotes = quotes,
        duration = plural(days, "día", "días"),
    );
    text.push_str(&ctx.footer());
    Ok(text)
}

/// Full cost sheet for operations: every non-zero line item per selected
/// class plus the distance and fuel assumptions behind it.
pub fn internal_text(ctx: &SummaryContext) -> Result<String> {
    ctx.ensure_selection()?;

    let config = ctx.config;
    let details = ctx
        .result
        .selected(ctx.selection)
        .map(|quote| {
            let costs = &quote.costs;
            let mut lines = vec![format!(
                "*{}* ({} pasajeros)",
                quote.vehicle_type.label(),
                quote.capacity
            )];
            let mut item = |amount: f64, line: String| {
                if amount != 0.0 {
                    lines.push(line);
                }
            };

            let empty_return = if config.return_vehicle_empty {
                " (incluye regreso vacío)"
            } else {
                ""
            };
            item(costs.fuel, format!("• Gasolina: ${:.2}{}", costs.fuel, empty_return));
            item(costs.tolls, format!("• Casetas: ${:.2}", costs.tolls));
            item(
                costs.accommodation,
                format!(
                    "• Viáticos: ${:.2} ({})",
                    costs.accommodation,
                    plural(ctx.schedule.nights, "noche", "noches")
                ),
            );
            item(
                costs.pension,
                format!(
                    "• Pensión: ${:.2} ({})",
                    costs.pension,
                    plural(ctx.schedule.days, "día", "días")
                ),
            );
            item(
                costs.vehicle_rental,
                format!(
                    "• Renta unidad: ${:.2} (${:.2}/día)",
                    costs.vehicle_rental,
                    config.daily_rate.rate(quote.vehicle_type)
                ),
            );
            item(
                costs.driver,
                format!("• Chofer ({}%): ${:.2}", config.driver_percentage, costs.driver),
            );
            item(costs.bus, format!("• Autobús (ida y regreso): ${:.2}", costs.bus));
            item(
                costs.airport_fee,
                format!("• Derecho de piso (aeropuerto): ${:.2}", costs.airport_fee),
            );

            lines.push(format!("*TOTAL: ${}*", format_money(costs.total)));
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n---\n");

    let result = ctx.result;
    let mut text = format!(
        "🔧 *COTIZACIÓN INTERNA*\n\n\
         Cliente: {client}\n\n\
         *ITINERARIO*\n{itinerary}\n\n\
         *DESGLOSE DE COSTOS*\n\
         📏 Kilometraje total: {total_km:.2} km\n\
         📏 Ida y regreso: {base_km:.2} km\n",
        client = ctx.client(),
        itinerary = ctx.itinerary_lines("Fecha"),
        total_km = result.total_round_trip_km,
        base_km = result.base_round_trip_km,
    );
    if result.extra_km != 0.0 {
        text.push_str(&format!("📏 Kilómetros extra: {:.2} km\n", result.extra_km));
    }
    text.push_str(&format!(
        "📅 Días de viaje: {days}\n\
         ⛽ Rendimiento: {efficiency} km/litro\n\
         💵 Precio gasolina: ${price}/litro\n\n\
         {details}\n\n\
         🔍 Validar gastos reales vs. cotización",
        days = result.days,
        efficiency = config.fuel_efficiency_km_per_liter,
        price = config.fuel_price_per_liter,
        details = details,
    ));
    text.push_str(&ctx.footer());
    Ok(text)
}
