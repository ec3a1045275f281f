use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use homescope::config::{LoggingSettings, Settings};
use homescope::routes::{self, AppState};
use homescope::services::build_store;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `LOG_LEVEL` / `LOG_FORMAT` override the configured values
fn init_logging(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load();
    init_logging(
        loaded
            .as_ref()
            .map(|settings| &settings.logging)
            .unwrap_or(&LoggingSettings::default()),
    );

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    info!("Starting Homescope listing service...");

    let store = build_store(&settings).map_err(|e| {
        error!("Failed to initialize record store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!(
        "Record store ready (backend: {}, featured limit: {}, compare max: {})",
        store.backend_name(),
        settings.listings.featured_limit,
        settings.listings.compare_max_items
    );

    let app_state = AppState::build(store, &settings);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_app)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
