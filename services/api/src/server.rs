use crate::cli::ServeArgs;
use crate::infra::{AppState, RuntimeInfo};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_housing::config::AppConfig;
use campus_housing::error::AppError;
use campus_housing::preferences::{AutoSaver, FilePreferenceStore};
use campus_housing::presentation::map_view_for;
use campus_housing::search::SearchService;
use campus_housing::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(FilePreferenceStore::new(
        config.storage.preferences_dir.clone(),
    ));
    let search = SearchService::from_config(&config.search)?
        .with_autosave(AutoSaver::new(store.clone()));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        search,
        map_view: Arc::from(map_view_for(config.presentation.map_surface)),
        runtime: RuntimeInfo::new(config.environment.label(), config.version.clone()),
    };

    let app = with_api_routes(store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        preferences_dir = %config.storage.preferences_dir.display(),
        map_surface = ?config.presentation.map_surface,
        "campus housing service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
