use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use gp_contracts::config::Settings;
use gp_contracts::routes;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting GP contract validation service...");

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let max_bytes = settings.payload.max_bytes;

    info!("Starting HTTP server on {}:{} (max payload {} bytes)", host, port, max_bytes);

    let mut server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(
                web::JsonConfig::default()
                    .limit(max_bytes)
                    .error_handler(routes::handle_json_payload_error),
            )
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    });

    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    server
        .bind((host, port))
        .map_err(|e| {
            error!("Failed to bind: {}", e);
            e
        })?
        .run()
        .await
}
