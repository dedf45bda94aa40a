use std::sync::Arc;

use clap::Parser;
use route_synth::{
    AppState, config::Args, create_router, geocode::NominatimClient, osrm::OsrmClient,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "route_synth=debug,tower_http=info,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.service_config();

    let router = OsrmClient::new(&args.osrm_url, args.router_timeout())?;
    let geocoder = NominatimClient::new(&args.nominatim_url, args.router_timeout())?;
    tracing::info!("road router: {}", args.osrm_url);
    tracing::info!("geocoder: {}", args.nominatim_url);
    tracing::info!(
        "limits: {} route(s) per request, {} km max, {} concurrent router call(s), {:?} timeout",
        config.max_routes,
        config.max_distance_km,
        config.routing.max_concurrency,
        config.routing.timeout
    );

    let state = AppState {
        router: Arc::new(router),
        geocoder: Arc::new(geocoder),
        config,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = create_router(state).layer(cors);

    tracing::info!("Starting route_synth on http://{}", args.bind);
    tracing::info!("API endpoints:");
    tracing::info!("  POST /api/routes/generate - Generate loop or point-to-point routes");
    tracing::info!("  POST /api/routes/gpx - Export a generated route as GPX");
    tracing::info!("  GET /api/geocode?q= - Resolve an address to a coordinate");
    tracing::info!("  GET /api/health - Liveness probe");

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
