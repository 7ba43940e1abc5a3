use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use gigebid_matchmaker::config::{CandidateSource, Settings};
use gigebid_matchmaker::core::TeamMatcher;
use gigebid_matchmaker::routes::{self, teams::AppState};
use gigebid_matchmaker::services::{load_candidates_file, CandidateCache, CandidateRepository, SupabaseClient};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

/// Build the candidate repository selected in settings
fn build_repository(settings: &Settings) -> std::io::Result<CandidateRepository> {
    let repo = &settings.repository;

    match repo.source {
        CandidateSource::Snapshot => {
            let candidates = load_candidates_file(&repo.snapshot_path).map_err(|e| {
                error!("Failed to load candidate snapshot: {}", e);
                config_error(e)
            })?;
            info!("Loaded {} candidates from {}", candidates.len(), repo.snapshot_path);
            Ok(CandidateRepository::from_candidates(candidates))
        }
        CandidateSource::Supabase => {
            let client = SupabaseClient::new(
                repo.supabase_url.clone(),
                repo.supabase_key.clone(),
                repo.supabase_table.clone(),
                repo.timeout_secs.unwrap_or(30),
            )
            .map_err(|e| {
                error!("Failed to create Supabase client: {}", e);
                config_error(e)
            })?;
            let cache = CandidateCache::new(settings.cache.max_entries, settings.cache.ttl_secs);
            info!(
                "Supabase repository initialized (table: {}, cache TTL: {}s)",
                client.table(), settings.cache.ttl_secs
            );
            Ok(CandidateRepository::Supabase {
                client: Arc::new(client),
                cache,
            })
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        config_error(e)
    })?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting GigeBid matchmaker service...");
    info!("Configuration loaded successfully");

    let repository = build_repository(&settings)?;

    let optimizer = settings.optimizer.to_config().map_err(|e| {
        error!("Invalid optimizer settings: {}", e);
        config_error(e)
    })?;
    let matcher = Arc::new(TeamMatcher::new(optimizer));

    info!("Matcher initialized with optimizer config: {:?}", optimizer);

    // Build application state
    let app_state = AppState {
        repository,
        matcher,
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
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
