use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use ewaste_match::config::{DirectorySource, LogFormat, LoggingSettings, Settings};
use ewaste_match::core::{Recommender, RecommenderOptions};
use ewaste_match::routes::{self, recommendations::AppState};
use ewaste_match::services::{
    AppwriteDirectory, OpenAiClient, OrganisationDirectory, SeedDirectory, TextGenerator,
};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

fn build_directory(settings: &Settings) -> std::io::Result<Arc<dyn OrganisationDirectory>> {
    let to_io = |e: ewaste_match::services::DirectoryError| {
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    };

    match settings.directory.source {
        DirectorySource::Appwrite => {
            let Some(appwrite) = settings.appwrite.clone() else {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "directory.source is appwrite but no [appwrite] section is configured",
                ));
            };
            let directory = AppwriteDirectory::new(
                appwrite.endpoint,
                appwrite.api_key,
                appwrite.project_id,
                appwrite.database_id,
                appwrite.organisation_profiles,
                appwrite.page_size,
            )
            .map_err(to_io)?;
            Ok(Arc::new(directory))
        }
        DirectorySource::Seed => {
            let directory = match &settings.directory.seed_path {
                Some(path) => SeedDirectory::from_path(path),
                None => SeedDirectory::builtin(),
            }
            .map_err(to_io)?;
            info!("Seed directory holds {} organisations", directory.len());
            Ok(Arc::new(directory))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration, from EWASTE_CONFIG when given
    let loaded = match std::env::var("EWASTE_CONFIG") {
        Ok(path) if !path.is_empty() => Settings::load_from(path),
        _ => Settings::load(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting E-Waste Match recommendation service...");

    let directory = build_directory(&settings).map_err(|e| {
        error!("Failed to initialise organisation directory: {}", e);
        e
    })?;

    info!("Organisation directory initialized ({})", directory.name());

    let generator = OpenAiClient::new(
        settings.llm.base_url.clone(),
        settings.llm.api_key.clone(),
        settings.llm.model.clone(),
        settings.llm.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create text-generation client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if !generator.is_configured() {
        warn!("OPENAI_API_KEY is not set. Recommendations will use keyword matching");
    } else {
        info!("Language-model ranking enabled (model: {})", generator.model());
    }

    let recommender = Recommender::new(
        directory,
        Arc::new(generator),
        RecommenderOptions {
            temperature: settings.llm.temperature,
            generation_timeout: settings.llm.timeout(),
            ..Default::default()
        },
    );

    let app_state = AppState { recommender };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
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
