//! Runs one delivery query cycle against a backend and prints the map.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tavili::{
    ClientConfig, ClientProfile, DeliveryQueryClient, Endpoint, GeolocationResolver, HttpTransport,
    MapSession,
};

mod cli;

use cli::Opts;

fn load_config(opts: &Opts) -> Result<ClientConfig> {
    let mut config = match &opts.config {
        Some(path) => ClientConfig::from_path(path).with_context(|| format!("loading {path}"))?,
        None => match ClientProfile::from_name(&opts.profile) {
            Some(profile) => profile.resolve(),
            None => bail!("unknown profile {:?}, try courier or recipient", opts.profile),
        },
    };

    if let Some(base_url) = &opts.base_url {
        config.query.base_url = base_url.clone();
    }
    if let Some(radius) = opts.radius {
        config.query.radius_degrees = radius;
    }
    if let Some(poi) = &opts.point_of_interest {
        config.query.point_of_interest = Some(poi.parse::<Endpoint>()?);
    }
    // There is no device to ask from a terminal.
    config.location.force_manual = true;
    if opts.position.is_some() {
        config.location.manual_position = opts.position.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tavili::init_logging();

    let opts = Opts::parse();
    let config = load_config(&opts)?;
    log::debug!("Using {:?}", config.query);

    let transport = HttpTransport::from_config(&config.query)?;
    let client = DeliveryQueryClient::from_config(transport, &config.query);
    let resolver = GeolocationResolver::from_config(None, &config.location);

    let mut session = MapSession::new(config)?;
    match session.run_query_cycle(&resolver, &client).await? {
        Some(summary) => log::info!(
            "{} deliveries, {} rejected, radius {} m",
            summary.deliveries,
            summary.rejected,
            summary.radius_meters
        ),
        None => log::warn!("Nothing rendered"),
    }

    for id in &opts.clicks {
        match session.click_marker(id) {
            Ok(Some(route)) => log::info!("{id}: drew {} point route", route.points().len()),
            Ok(None) => log::info!("{id}: no route to draw"),
            Err(e) => eprintln!("{id}: {e}"),
        }
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&session.scene())?);
    } else {
        println!("{}", session.describe());
        println!();
        for line in session.log().lines() {
            println!("{line}");
        }
    }

    Ok(())
}
