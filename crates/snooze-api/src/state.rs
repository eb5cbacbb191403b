//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use snooze_auth::TokenAuthenticator;
use snooze_db::Database;

/// Handle used to render the Prometheus exposition format
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: TokenAuthenticator,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            auth: TokenAuthenticator::new(db.clone()),
            db,
        }
    }
}
