use clap::Parser;
use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::EnvFilter;

use medboard_backend::api::{AuthApi, HealthApi};
use medboard_backend::app_data::AppData;
use medboard_backend::cli::{Cli, Command};
use medboard_backend::config::{Settings, SystemEnvironment};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let settings = match Settings::from_provider(&SystemEnvironment) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::debug!(?settings, "configuration loaded");

    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("database migrations completed");

    if let Some(Command::Migrate) = cli.command {
        return Ok(());
    }

    let bind_address = settings.bind_address.clone();
    let app_data = AppData::init(db, settings);

    let auth_api = AuthApi::new(app_data.auth_service.clone());
    let api_service = OpenApiService::new((HealthApi, auth_api), "Medboard API", "0.1.0")
        .server(format!("http://{bind_address}/api"));
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(%bind_address, "starting server");
    Server::new(TcpListener::bind(bind_address)).run(app).await
}
