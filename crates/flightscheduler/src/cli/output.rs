//! Rendering of records for the terminal.
//!
//! Every renderer returns a `String` so the binary decides where it goes.

use serde::Serialize;

use crate::model::{Aircraft, Airline, Airport, FlightCrew};
use crate::scheduler::{FlightDetails, FlightFormOptions};
use crate::storage::StorageStats;
use crate::validation::ValidationErrors;

use super::OutputFormat;

/// A record that can be shown as a table row.
pub trait Tabular {
    /// Column headers.
    const HEADERS: &'static [&'static str];

    /// Cell values, one per header.
    fn row(&self) -> Vec<String>;

    /// A one-line description.
    fn summary(&self) -> String;
}

fn id_cell(id: Option<i64>) -> String {
    id.map_or_else(String::new, |id| id.to_string())
}

impl Tabular for Aircraft {
    const HEADERS: &'static [&'static str] = &["ID", "Model", "Crew", "Passengers", "Fuel (l)"];

    fn row(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            self.model.clone(),
            self.crew_capacity.to_string(),
            self.passenger_capacity.to_string(),
            self.fuel_tank_capacity.to_string(),
        ]
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} (crew {}, {} seats)",
            id_cell(self.id),
            self.model,
            self.crew_capacity,
            self.passenger_capacity
        )
    }
}

impl Tabular for Airline {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Country"];

    fn row(&self) -> Vec<String> {
        vec![id_cell(self.id), self.name.clone(), self.country.clone()]
    }

    fn summary(&self) -> String {
        format!("{}: {} ({})", id_cell(self.id), self.name, self.country)
    }
}

impl Tabular for Airport {
    const HEADERS: &'static [&'static str] = &["ID", "Code", "Name"];

    fn row(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            self.code().unwrap_or("-").to_string(),
            self.name.clone(),
        ]
    }

    fn summary(&self) -> String {
        format!("{}: {}", id_cell(self.id), self.name)
    }
}

impl Tabular for FlightCrew {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Age", "Position", "Available"];

    fn row(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            self.full_name(),
            self.age.map(|age| age.to_string()).unwrap_or_default(),
            self.position.to_string(),
            if self.is_available { "yes" } else { "no" }.to_string(),
        ]
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} ({}{})",
            id_cell(self.id),
            self.full_name(),
            self.position,
            if self.is_available { "" } else { ", assigned" }
        )
    }
}

impl Tabular for FlightDetails {
    const HEADERS: &'static [&'static str] = &[
        "ID", "From", "To", "Departs", "Arrives", "Gate", "Airline", "Aircraft", "Crew",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            id_cell(self.flight.id),
            airport_label(&self.origin),
            airport_label(&self.destination),
            self.flight.departure_time.format("%Y-%m-%d %H:%M").to_string(),
            self.flight.arrival_time.format("%Y-%m-%d %H:%M").to_string(),
            self.flight.gate.clone().unwrap_or_default(),
            self.airline.name.clone(),
            self.aircraft.model.clone(),
            self.crew
                .iter()
                .map(FlightCrew::full_name)
                .collect::<Vec<_>>()
                .join(", "),
        ]
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} -> {} departing {} ({}, {}, {} crew)",
            id_cell(self.flight.id),
            airport_label(&self.origin),
            airport_label(&self.destination),
            self.flight.departure_time.format("%Y-%m-%d %H:%M"),
            self.airline.name,
            self.aircraft.model,
            self.crew.len()
        )
    }
}

fn airport_label(airport: &Airport) -> String {
    airport
        .code()
        .map_or_else(|| airport.name.clone(), str::to_string)
}

/// Render a list of records.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_list<T: Tabular + Serialize>(
    format: OutputFormat,
    items: &[T],
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(items),
        OutputFormat::Table => Ok(table(T::HEADERS, items.iter().map(T::row))),
        OutputFormat::Plain => Ok(if items.is_empty() {
            "(none)".to_string()
        } else {
            items
                .iter()
                .map(T::summary)
                .collect::<Vec<_>>()
                .join("\n")
        }),
    }
}

/// Render a single record.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_record<T: Tabular + Serialize>(
    format: OutputFormat,
    item: &T,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(item),
        OutputFormat::Table => Ok(table(T::HEADERS, std::iter::once(item.row()))),
        OutputFormat::Plain => {
            let width = T::HEADERS.iter().map(|h| h.len()).max().unwrap_or(0);
            Ok(T::HEADERS
                .iter()
                .zip(item.row())
                .map(|(header, value)| format!("{header:<width$}  {value}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

/// Render validation messages, one per line.
#[must_use]
pub fn render_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the choices for a flight form.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_options(
    format: OutputFormat,
    options: &FlightFormOptions,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(options);
    }

    let mut sections = vec![
        section("Aircraft", &options.aircraft),
        section("Airlines", &options.airlines),
        section("Airports", &options.airports),
        section("Captains", &options.captains),
        section("First officers", &options.first_officers),
        section("Other crew", &options.other_crew),
    ];
    if !options.selected_crew.is_empty() {
        let selected = options
            .selected_crew
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        sections.push(format!("Selected crew: {selected}"));
    }
    Ok(sections.join("\n\n"))
}

fn section<T: Tabular>(title: &str, items: &[T]) -> String {
    let mut lines = vec![format!("{title}:")];
    if items.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(items.iter().map(|item| format!("  {}", item.summary())));
    lines.join("\n")
}

/// Render database statistics.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_stats(
    format: OutputFormat,
    database: &std::path::Path,
    stats: &StorageStats,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        let status = serde_json::json!({
            "database_path": database,
            "stats": stats,
        });
        return serde_json::to_string_pretty(&status);
    }

    Ok([
        "flightsched status".to_string(),
        "------------------".to_string(),
        format!("Database:      {}", database.display()),
        format!("Size:          {} bytes", stats.db_size_bytes),
        format!("Aircraft:      {}", stats.aircraft),
        format!("Airlines:      {}", stats.airlines),
        format!("Airports:      {}", stats.airports),
        format!(
            "Crew:          {} ({} available)",
            stats.crew, stats.available_crew
        ),
        format!("Flights:       {}", stats.flights),
    ]
    .join("\n"))
}

fn table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(ToString::to_string).collect())];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}
