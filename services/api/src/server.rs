use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_prequalification_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tenant_prequal::config::AppConfig;
use tenant_prequal::error::AppError;
use tenant_prequal::qualification::{verify_totality, QualificationEngine, RuleTable};
use tenant_prequal::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let table = RuleTable::standard();
    if config.qualification.verify_on_start {
        verify_totality(table)?;
    } else {
        warn!(version = table.version().label, "rule table verification skipped");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_prequalification_routes(QualificationEngine::new(table))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rule_table = table.version().label,
        employment_types = table.entries().len(),
        "pre-qualification service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
