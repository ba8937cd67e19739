use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trip_planner::cache::{CachingClient, ResponseCache};
use trip_planner::config::ServiceConfig;
use trip_planner::http::HttpGeoClient;
use trip_planner::{TravelMode, TripInputs, TripPlanner};

/// Plan a trip between two places with a few stops on the way.
#[derive(Debug, Parser)]
#[command(name = "trip-planner", version)]
struct Cli {
    /// Origin (address or city)
    origin: String,

    /// Final destination (address or city)
    destination: String,

    /// Area to explore for stops (defaults to the destination)
    #[arg(long)]
    city: Option<String>,

    /// Anything specific to add, e.g. pharmacy, coffee, or a named place
    #[arg(long, default_value = "")]
    need: String,

    #[arg(long, default_value = "driving")]
    mode: TravelMode,

    /// Stops before the final destination
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=12))]
    top_k: u8,

    /// Search radius in meters
    #[arg(long, default_value_t = 4000, value_parser = clap::value_parser!(u32).range(500..=10_000))]
    radius_m: u32,

    #[arg(long, default_value_t = 0.25)]
    cost_per_km: f64,

    #[arg(long, default_value_t = 5.0)]
    time_value_per_hr: f64,

    /// Skip fetching the route polyline
    #[arg(long)]
    no_geometry: bool,

    #[arg(long)]
    nominatim_url: Option<String>,

    #[arg(long)]
    photon_url: Option<String>,

    /// Overpass mirror; repeat to try several in order
    #[arg(long = "overpass-url")]
    overpass_urls: Vec<String>,

    #[arg(long)]
    osrm_url: Option<String>,

    #[arg(long)]
    user_agent: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::default();
        if let Some(url) = &self.nominatim_url {
            config.geocoding.nominatim_url = url.clone();
        }
        if let Some(url) = &self.photon_url {
            config.geocoding.photon_url = url.clone();
        }
        if !self.overpass_urls.is_empty() {
            config.overpass.endpoints = self.overpass_urls.clone();
        }
        if let Some(url) = &self.osrm_url {
            config.osrm.base_url = url.clone();
        }
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        config.osrm.fetch_geometry = !self.no_geometry;
        config
    }

    fn trip_inputs(&self) -> TripInputs {
        TripInputs {
            city: self.city.clone(),
            specific_need: self.need.trim().to_string(),
            mode: self.mode,
            top_k: usize::from(self.top_k),
            radius_m: self.radius_m,
            cost_per_km: self.cost_per_km,
            time_value_per_hr: self.time_value_per_hr,
            ..TripInputs::new(self.origin.clone(), self.destination.clone())
        }
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "trip_planner=debug,info"
    } else {
        "trip_planner=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = cli.service_config();
    let http = HttpGeoClient::new(&config.user_agent).context("failed to build HTTP client")?;
    let client = CachingClient::new(http, Arc::new(ResponseCache::new()));

    let plan = TripPlanner::new(&client, &config)
        .plan(&cli.trip_inputs())
        .context("trip planning failed")?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &plan).context("failed to write plan")?;
    writeln!(stdout)?;
    Ok(())
}
