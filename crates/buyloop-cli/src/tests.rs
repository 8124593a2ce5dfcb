use std::path::Path;

use buyloop_core::{AppConfig, Coordinates, Environment};

use super::*;

const CATALOG: &str = r#"[
  {"id": "1", "name": "Farmacia Central", "category": "Farmacia",
   "address": "4a Calle 2-15, Zona 1", "coords": [14.7190, -90.6390], "rating": 4.5,
   "hours": {"sunday": "closed", "tuesday": "8:00-20:00", "monday": "8:00-20:00"},
   "featured": true},
  {"id": "2", "name": "Café Capital", "category": "Café",
   "address": "6a Avenida, Guatemala", "coords": [14.6349, -90.5069], "rating": 4.1},
  {"id": "3", "name": "Ferretería El Martillo", "category": "Ferretería",
   "coords": [14.7500, -90.6300]}
]"#;

fn config_in(dir: &Path) -> AppConfig {
    let catalog_path = dir.join("businesses.json");
    std::fs::write(&catalog_path, CATALOG).expect("write catalog");
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "warn".to_string(),
        data_path: dir.join("data").join("buyloop.json"),
        catalog_path,
        reference_point: Coordinates::new(14.7174, -90.6413),
        default_distance_km: 0.0,
        api_keys: Vec::new(),
    }
}

fn parse(args: &[&str]) -> Commands {
    Cli::try_parse_from(args)
        .expect("expected valid cli args")
        .command
        .expect("expected a command")
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["buyloop-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_all_filters() {
    let command = parse(&[
        "buyloop-cli",
        "search",
        "-q",
        "farmacia",
        "--category",
        "Farmacia",
        "-d",
        "5",
        "--lat",
        "14.63",
        "--lng",
        "-90.5",
        "--json",
    ]);

    assert!(matches!(
        command,
        Commands::Search {
            query: Some(ref q),
            category: Some(ref c),
            distance: Some(d),
            lat: Some(_),
            lng: Some(lng),
            json: true,
            ..
        } if q == "farmacia" && c == "Farmacia" && (d - 5.0).abs() < f64::EPSILON && lng < 0.0
    ));
}

#[test]
fn parses_search_without_filters() {
    let command = parse(&["buyloop-cli", "search"]);
    assert!(matches!(
        command,
        Commands::Search {
            catalog: None,
            query: None,
            category: None,
            distance: None,
            json: false,
            ..
        }
    ));
}

#[test]
fn parses_show_requires_id() {
    assert!(Cli::try_parse_from(["buyloop-cli", "show"]).is_err());
    let command = parse(&["buyloop-cli", "show", "7"]);
    assert!(matches!(command, Commands::Show { ref id, catalog: None } if id == "7"));
}

#[test]
fn parses_seed_force_flag() {
    let command = parse(&["buyloop-cli", "seed", "--force"]);
    assert!(matches!(
        command,
        Commands::Seed {
            force: true,
            catalog: None
        }
    ));
}

#[test]
fn search_table_lists_every_match_when_inactive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let output = commands::run(parse(&["buyloop-cli", "search"]), &config).expect("search");
    assert!(output.contains("Farmacia Central"));
    assert!(output.contains("Café Capital"));
    assert!(output.ends_with("3 result(s)\n"));
}

#[test]
fn search_honours_distance_and_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let output = commands::run(
        parse(&["buyloop-cli", "search", "-d", "5", "-q", "ferre"]),
        &config,
    )
    .expect("search");
    assert!(output.contains("Ferretería El Martillo"));
    assert!(!output.contains("Farmacia Central"));
    assert!(output.ends_with("1 result(s)\n"));
}

#[test]
fn search_with_no_matches_says_so() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let output = commands::run(parse(&["buyloop-cli", "search", "-q", "panadería"]), &config)
        .expect("search");
    assert_eq!(output, "no businesses match\n");
}

#[test]
fn search_json_carries_distance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let output = commands::run(
        parse(&["buyloop-cli", "search", "--category", "Café", "--json"]),
        &config,
    )
    .expect("search");
    let json: serde_json::Value = serde_json::from_str(&output).expect("json output");
    let items = json.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "2");
    assert!(items[0]["distance_km"].as_f64().expect("distance") > 15.0);
}

#[test]
fn search_rejects_invalid_origin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let result = commands::run(parse(&["buyloop-cli", "search", "--lat", "91"]), &config);
    assert!(result.is_err());
}

#[test]
fn categories_are_sorted_one_per_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let output = commands::run(parse(&["buyloop-cli", "categories"]), &config).expect("categories");
    assert_eq!(output, "Café\nFarmacia\nFerretería\n");
}

#[test]
fn show_renders_detail_and_unknown_id_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let output = commands::run(parse(&["buyloop-cli", "show", "1"]), &config).expect("show");
    assert!(output.starts_with("Farmacia Central (#1)\n"));
    assert!(output.contains("sunday     closed"));
    let monday = output.find("monday").expect("monday listed");
    let tuesday = output.find("tuesday").expect("tuesday listed");
    let sunday = output.find("sunday").expect("sunday listed");
    assert!(monday < tuesday && tuesday < sunday, "hours out of week order:\n{output}");
    assert!(output.contains("m away)"));

    let missing = commands::run(parse(&["buyloop-cli", "show", "99"]), &config);
    assert!(missing.is_err());
}

#[test]
fn seed_writes_store_once_unless_forced() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let first = commands::run(parse(&["buyloop-cli", "seed"]), &config).expect("seed");
    assert!(first.starts_with("seeded 3 businesses"));
    assert!(config.data_path.exists());

    let second = commands::run(parse(&["buyloop-cli", "seed"]), &config).expect("seed");
    assert!(second.contains("already holds 3 businesses"));

    let forced = commands::run(parse(&["buyloop-cli", "seed", "--force"]), &config).expect("seed");
    assert!(forced.starts_with("seeded 3 businesses"));
}

#[test]
fn missing_catalog_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());

    let result = commands::run(
        parse(&["buyloop-cli", "categories", "--catalog", "/nonexistent/catalog.json"]),
        &config,
    );
    assert!(result.is_err());
}
