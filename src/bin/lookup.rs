//! Runs a single lookup from the command line and prints the result.
//!
//! Usage: `lookup <mobile|national-id|vehicle> <value> [--json]`
//!
//! Upstream URLs come from the same environment variables as the server.

use lookup_portal::config::Config;
use lookup_portal::models::{ResultEnvelope, SearchOutcome, UserRecord, VehicleResult};
use lookup_portal::normalizer::{SearchRequest, SearchType};
use lookup_portal::orchestrator::LookupOrchestrator;
use lookup_portal::session::SearchSession;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lookup_portal=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let as_json = if let Some(pos) = args.iter().position(|a| a == "--json") {
        args.remove(pos);
        true
    } else {
        false
    };

    let [search_type, value] = args.as_slice() else {
        anyhow::bail!("usage: lookup <mobile|national-id|vehicle> <value> [--json]");
    };
    let search_type: SearchType = search_type.parse()?;

    let config = Config::from_env()?;
    let orchestrator = LookupOrchestrator::from_config(&config)?;
    let session = SearchSession::new();

    let request = SearchRequest::new(search_type, value.as_str());
    let outcome = session.submit(&orchestrator, &request).await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SearchOutcome::Success(ResultEnvelope::User(user)) => print_user(&user),
        SearchOutcome::Success(ResultEnvelope::Vehicle(vehicle)) => print_vehicle(&vehicle),
        SearchOutcome::NoResults => println!(
            "No results found for {} {}",
            request.search_type.label(),
            request.raw_value
        ),
        SearchOutcome::Error(message) => {
            eprintln!("Something went wrong: {}", message);
            std::process::exit(1);
        }
        SearchOutcome::Idle | SearchOutcome::Loading => {}
    }

    Ok(())
}

fn row(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("  {:<22} {}", label, value);
    }
}

/// Always-shown vehicle fields fall back to `N/A`.
fn or_na(value: &Option<String>) -> Option<&str> {
    Some(value.as_deref().unwrap_or("N/A"))
}

fn print_user(user: &UserRecord) {
    println!("[{}] {}", user.initial(), user.display_name());
    row("Circle", user.circle.as_deref());
    row("Mobile Number", user.mobile.as_deref());
    row("Aadhaar / ID", user.id.as_deref());
    row("Father's Name", user.fname.as_deref());
    row("Email", user.email.as_deref());
    row("Alternate Contact", user.alt.as_deref());
    row("Address", user.formatted_address().as_deref());
}

fn print_vehicle(vehicle: &VehicleResult) {
    let details = &vehicle.vehicle_details;
    println!(
        "Vehicle Found: {} [{}]",
        details.registration_no.as_deref().unwrap_or("-"),
        details.rc_status_label()
    );

    if let Some(number) = vehicle.mobile_info.as_ref().and_then(|m| m.verified_number()) {
        println!("  Owner's mobile number: {} (verified)", number);
    }

    row("Owner Name", or_na(&details.owner_name));
    row("Make & Model", or_na(&details.maker_model));
    row("Chassis Number", or_na(&details.chassis_no));
    row("Engine Number", or_na(&details.engine_no));
    row("Color", or_na(&details.vehicle_color));
    row("Fuel Type", or_na(&details.fuel_type));
    row("Vehicle Class", or_na(&details.vehicle_class));
    row("Registration Date", or_na(&details.registration_date));
    row("Insurance Company", details.insurance_company.as_deref());
    row("Insurance Valid Until", details.insurance_upto.as_deref());
    row("RTO Authority", details.registration_authority.as_deref());
}
