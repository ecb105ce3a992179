use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, AppState, InMemorySchedulingRepository, LoggingNotificationPublisher, SeedData,
};
use crate::routes::with_scheduling_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use volunteer_portal::config::AppConfig;
use volunteer_portal::error::AppError;
use volunteer_portal::telemetry;
use volunteer_portal::workflows::scheduling::ShiftRegistrationService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.scheduling.training_catalog.as_deref())?;
    let seed = match args.seed.as_deref() {
        Some(path) => SeedData::from_path(path)?,
        None => {
            warn!("no seed file supplied; starting with an empty roster");
            SeedData::default()
        }
    };
    let repository = Arc::new(InMemorySchedulingRepository::seeded(seed));
    if let Ok((volunteers, opportunities)) = repository.counts() {
        info!(volunteers, opportunities, "roster loaded");
    }

    let notifications = Arc::new(LoggingNotificationPublisher::default());
    let registration_service = Arc::new(ShiftRegistrationService::new(
        repository,
        notifications,
        catalog,
    ));

    let app = with_scheduling_routes(registration_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "volunteer portal scheduling service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
