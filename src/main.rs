use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vibe_match::config::{LogFormat, LoggingSettings, Settings};
use vibe_match::core::{Assembler, Ranker};
use vibe_match::routes::{self, handle_json_payload_error, vibes::AppState};
use vibe_match::services::OracleClient;

/// Initialize logging; RUST_LOG takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.log_format() {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Text => subscriber.init(),
    }
}

fn startup_error(message: String) -> std::io::Error {
    error!("{}", message);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            return Err(startup_error(format!("Failed to load configuration: {}", e)));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting Vibe Match service...");

    // Schema and weight table mismatches stop the process here
    let schema = Arc::new(
        settings
            .facet_schema()
            .map_err(|e| startup_error(format!("Invalid facet schema: {}", e)))?,
    );

    info!(
        "Facet schema loaded: {}",
        schema
            .facets()
            .iter()
            .map(|facet| format!("{}={:.2}", facet.name, facet.weight))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if settings.oracle.api_key.is_empty() {
        error!("No oracle API key configured; every request will use the fallback result");
    }

    let oracle = Arc::new(
        OracleClient::new(&settings.oracle, Arc::clone(&schema))
            .map_err(|e| startup_error(format!("Failed to create oracle client: {}", e)))?,
    );

    info!("Oracle client initialized (model: {})", settings.oracle.model);

    let assembler = Arc::new(Assembler::new(
        Ranker::new(Arc::clone(&schema)),
        settings.ranking.max_tags,
    ));

    let app_state = AppState {
        oracle,
        assembler,
        ranking: settings.ranking.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
