/**
 * SYMBION HBS - Point d'entrée du heartbeat server
 *
 * RÔLE : Chargement de la config, ouverture de la source de données,
 * remplissage des caches, rechargement périodique et API HTTP.
 *
 * ARCHITECTURE : Caches en snapshots (lecture sans attente) + résolution des
 * métriques builtin hôte -> groupes -> templates -> parents + service d'arbre.
 * UTILITÉ : Répond aux agents à chaque heartbeat avec la liste des métriques à remonter.
 */

mod cache;
mod config;
mod health;
mod http;
mod models;
mod ports;
mod resolver;
mod state;
mod tree;

use crate::cache::{spawn_cache_refresher, HbsCaches};
use crate::config::load_config;
use crate::health::HealthTracker;
use crate::http::AppState;
use crate::ports::{HbsPort, JsonStorePort};
use crate::resolver::MetricResolver;
use crate::tree::{NoTree, TreeClient, TreeSource};

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("symbion_hbs=info")))
        .init();

    let cfg = load_config().await;

    // source de données + premier remplissage des caches
    let port: Arc<dyn HbsPort + Send + Sync> = Arc::new(
        JsonStorePort::new(&cfg.data_path).with_context(|| format!("failed to open data store {}", cfg.data_path))?,
    );
    let caches = Arc::new(HbsCaches::new());
    caches.reload(port.as_ref());
    spawn_cache_refresher(caches.clone(), port.clone(), cfg.reload_interval());

    let tree: Arc<dyn TreeSource> = match &cfg.app_tree {
        Some(t) => {
            info!(addr = %t.addr, timeout_ms = t.timeout_ms, "tree service enabled");
            Arc::new(TreeClient::new(&t.addr, t.timeout()).context("failed to build tree client")?)
        }
        None => {
            info!("no tree service configured");
            Arc::new(NoTree)
        }
    };

    let app_state = AppState {
        caches: caches.clone(),
        resolver: MetricResolver::new(caches, port, tree),
        health_tracker: HealthTracker::new(),
    };
    let app = http::build_router(app_state);

    let listener = TcpListener::bind(&cfg.listen)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen))?;
    info!("listening on http://{}", cfg.listen);
    axum::serve(listener, app).await.context("http server stopped")?;
    Ok(())
}
