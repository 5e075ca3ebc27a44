use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{ConfigLoader, ServerSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let settings = ServerSettings::from_env()?;
    info!(config_dir = %settings.config_dir.display(), "Loading payroll configuration");

    let loader = ConfigLoader::load(&settings.config_dir)?;
    info!(
        code = %loader.metadata().code,
        version = %loader.metadata().version,
        rate_records = loader.rate_table().len(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(loader));

    info!("Server listening on {}", settings.bind_addr);
    info!("API Endpoints:");
    info!("  POST /calculate        - single payroll");
    info!("  POST /calculate/batch  - payroll batch");
    info!("  GET  /rates            - rate table");
    info!("  GET  /rates/:month     - rates in force for a month");

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
