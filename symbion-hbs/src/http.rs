/**
 * API REST HBS - Serveur HTTP du heartbeat server
 *
 * RÔLE :
 * Expose la résolution des métriques builtin aux agents et l'état des caches
 * aux outils d'administration.
 *
 * ROUTES :
 * - GET /health                            -> "ok"
 * - GET /system/health                     -> uptime + tailles des caches
 * - GET /agents/builtin-metrics?hostname=  -> métriques builtin d'un hôte
 * - GET /strategies                        -> stratégies en cache (triées par id)
 * - GET /templates/{id}/parents            -> chaîne d'héritage racine -> template
 *
 * Une erreur de la source de données ou du service d'arbre donne un 502 :
 * jamais de liste partielle.
 */

use crate::cache::HbsCaches;
use crate::health::{HbsHealth, HealthTracker};
use crate::models::{BuiltinMetric, Strategy, TemplateId};
use crate::resolver::MetricResolver;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub caches: Arc<HbsCaches>,
    pub resolver: MetricResolver,
    pub health_tracker: HealthTracker,
}

#[derive(Debug, Deserialize)]
struct HostParams {
    hostname: String,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/agents/builtin-metrics", get(get_builtin_metrics))
        .route("/strategies", get(list_strategies))
        .route("/templates/{id}/parents", get(get_template_parents))
        .with_state(app_state)
}

async fn get_system_health(State(st): State<AppState>) -> Json<HbsHealth> {
    Json(st.health_tracker.get_health(&st.caches))
}

async fn get_builtin_metrics(
    State(st): State<AppState>,
    Query(p): Query<HostParams>,
) -> Result<Json<Vec<BuiltinMetric>>, (StatusCode, String)> {
    match st.resolver.get_builtin_metrics(&p.hostname).await {
        Ok(metrics) => Ok(Json(metrics)),
        Err(e) => {
            warn!(hostname = %p.hostname, error = %e, "builtin metric resolution failed");
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

async fn list_strategies(State(st): State<AppState>) -> Json<Vec<Strategy>> {
    let map = st.caches.strategies.get_map();
    let mut out: Vec<Strategy> = map.values().cloned().collect();
    out.sort_by_key(|s| s.id);
    Json(out)
}

async fn get_template_parents(State(st): State<AppState>, Path(id): Path<TemplateId>) -> Json<Vec<TemplateId>> {
    Json(st.caches.templates.parent_ids(id))
}
