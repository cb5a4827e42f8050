use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use route_server::cache::CacheSet;
use route_server::engine::{EngineConfig, RoutingEngine};
use route_server::limiter::RateLimiter;
use route_server::locations::{
    LocationClientConfig, LocationResolver, LocationSearchProvider, SkyscannerLocationClient,
    StaticLocationProvider,
};
use route_server::providers::{
    BusProvider, FlightApi, FlightProvider, HereClient, HereConfig, PedestrianRoutingApi,
    ProviderSet, SkyscannerClient, SkyscannerConfig, TrainProvider, WalkProvider,
};
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // API keys are optional: without them the providers run entirely
    // on synthetic fallback data
    let skyscanner_key = std::env::var("SKYSCANNER_API_KEY").ok();
    let here_key = std::env::var("HERE_API_KEY").ok();
    if skyscanner_key.is_none() {
        eprintln!("Warning: SKYSCANNER_API_KEY not set. Flight search runs in fallback mode.");
    }
    if here_key.is_none() {
        eprintln!("Warning: HERE_API_KEY not set. Walking routes will be estimated.");
    }

    let caches = Arc::new(CacheSet::new());
    let limiter = Arc::new(RateLimiter::with_default_services());

    let flight_api: Option<Arc<dyn FlightApi>> = skyscanner_key.as_deref().map(|key| {
        let client = SkyscannerClient::new(SkyscannerConfig::new(key))
            .expect("Failed to create flight client");
        Arc::new(client) as Arc<dyn FlightApi>
    });
    let walk_api: Option<Arc<dyn PedestrianRoutingApi>> = here_key.as_deref().map(|key| {
        let client =
            HereClient::new(HereConfig::new(key)).expect("Failed to create routing client");
        Arc::new(client) as Arc<dyn PedestrianRoutingApi>
    });
    let location_provider: Arc<dyn LocationSearchProvider> = match skyscanner_key.as_deref() {
        Some(key) => Arc::new(
            SkyscannerLocationClient::new(LocationClientConfig::new(key))
                .expect("Failed to create location client"),
        ),
        None => Arc::new(StaticLocationProvider),
    };

    let resolver = Arc::new(LocationResolver::new(location_provider, Arc::clone(&caches)));
    let providers = ProviderSet {
        flight: Arc::new(FlightProvider::new(
            flight_api,
            Arc::clone(&caches),
            Arc::clone(&limiter),
        )),
        train: Arc::new(TrainProvider::new(
            Arc::clone(&caches),
            Arc::clone(&limiter),
        )),
        bus: Arc::new(BusProvider::new(Arc::clone(&caches), Arc::clone(&limiter))),
        walk: Arc::new(WalkProvider::new(
            walk_api,
            Arc::clone(&caches),
            Arc::clone(&limiter),
        )),
    };

    let engine = RoutingEngine::new(Arc::clone(&resolver), providers, EngineConfig::default());
    let state = AppState::new(engine, resolver);
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Route Planner listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET /health                - Health check");
    println!("  GET /api/routes            - Search for journeys");
    println!("  GET /api/locations/search  - Search for locations");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
