use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use buyloop_core::{
    available_categories, filter_with_distance, format_distance, haversine_km, load_catalog,
    AppConfig, Business, Coordinates, FilterSpec, Ranked,
};
use buyloop_store::Store;

use crate::Commands;

pub(crate) fn run(command: Commands, config: &AppConfig) -> anyhow::Result<String> {
    match command {
        Commands::Search {
            catalog,
            query,
            category,
            distance,
            lat,
            lng,
            json,
        } => {
            let businesses = read_catalog(catalog.as_deref(), config)?;
            let origin = Coordinates::new(
                lat.unwrap_or(config.reference_point.lat),
                lng.unwrap_or(config.reference_point.lng),
            );
            anyhow::ensure!(
                origin.is_valid(),
                "--lat/--lng [{}, {}] is not a valid coordinate pair",
                origin.lat,
                origin.lng
            );
            let spec = FilterSpec::around(origin)
                .with_text(query.unwrap_or_default())
                .with_category(category.unwrap_or_default())
                .within_km(distance.unwrap_or(config.default_distance_km));

            let ranked = filter_with_distance(&businesses, &spec);
            tracing::debug!(matches = ranked.len(), total = businesses.len(), "search done");
            if json {
                render_json(&ranked)
            } else {
                Ok(render_table(&ranked))
            }
        }
        Commands::Categories { catalog } => {
            let businesses = read_catalog(catalog.as_deref(), config)?;
            Ok(available_categories(&businesses)
                .into_iter()
                .map(|c| c + "\n")
                .collect())
        }
        Commands::Show { id, catalog } => {
            let businesses = read_catalog(catalog.as_deref(), config)?;
            let business = businesses
                .iter()
                .find(|b| b.id == id)
                .with_context(|| format!("no business with id {id}"))?;
            Ok(render_detail(business, config.reference_point))
        }
        Commands::Seed { catalog, force } => seed(catalog.as_deref(), force, config),
    }
}

fn read_catalog(explicit: Option<&Path>, config: &AppConfig) -> anyhow::Result<Vec<Business>> {
    let path = explicit.unwrap_or(&config.catalog_path);
    load_catalog(path).with_context(|| format!("loading catalog {}", path.display()))
}

fn seed(explicit: Option<&Path>, force: bool, config: &AppConfig) -> anyhow::Result<String> {
    let businesses = read_catalog(explicit, config)?;
    let count = businesses.len();
    let mut store = Store::open(config.data_path.clone())?;
    if force {
        store.clear()?;
    }

    let data_path = config.data_path.display();
    if store.seed_if_empty(businesses)? {
        Ok(format!("seeded {count} businesses into {data_path}\n"))
    } else {
        Ok(format!(
            "{data_path} already holds {} businesses; use --force to replace\n",
            store.businesses().len()
        ))
    }
}

fn render_table(ranked: &[Ranked<'_>]) -> String {
    if ranked.is_empty() {
        return "no businesses match\n".to_string();
    }

    let mut out = String::new();
    for item in ranked {
        let distance = item
            .distance_km
            .map_or_else(|| "-".to_string(), format_distance);
        let star = if item.business.featured { "*" } else { " " };
        let _ = writeln!(
            out,
            "{star}{:>4}  {:<32}  {:<24}  {distance:>8}",
            item.business.id, item.business.name, item.business.category
        );
    }
    let _ = writeln!(out, "{} result(s)", ranked.len());
    out
}

fn render_json(ranked: &[Ranked<'_>]) -> anyhow::Result<String> {
    let items: Vec<serde_json::Value> = ranked
        .iter()
        .map(|item| {
            let mut value = serde_json::to_value(item.business)?;
            value["distance_km"] = serde_json::json!(item.distance_km);
            Ok(value)
        })
        .collect::<Result<_, serde_json::Error>>()?;
    Ok(serde_json::to_string_pretty(&items)? + "\n")
}

fn render_detail(business: &Business, origin: Coordinates) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", business.name, business.id);
    let _ = writeln!(out, "  category: {}", business.category);
    let _ = writeln!(out, "  address:  {}", business.address);
    let _ = writeln!(out, "  rating:   {:.1}", business.rating);
    match business.valid_coords() {
        Some(coords) => {
            let km = haversine_km(origin, coords);
            let _ = writeln!(
                out,
                "  location: {:.4}, {:.4} ({} away)",
                coords.lat,
                coords.lng,
                format_distance(km)
            );
        }
        None => {
            let _ = writeln!(out, "  location: unknown");
        }
    }
    for (label, value) in [
        ("phone", &business.phone),
        ("email", &business.email),
        ("website", &business.website),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label:<8}: {value}");
        }
    }
    if !business.description.is_empty() {
        let _ = writeln!(out, "  {}", business.description);
    }
    for (day, hours) in &business.hours {
        let _ = writeln!(out, "  {day:<10} {hours}");
    }
    out
}
