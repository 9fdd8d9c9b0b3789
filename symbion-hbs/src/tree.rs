/**
 * CLIENT SERVICE D'ARBRE - Métriques liées directement à un hostname
 *
 * RÔLE :
 * Interroge le service d'arbre, indépendant du mécanisme de templates :
 * `GET <addr>/api/v1/tree/metrics?hostname=<name>` -> tableau JSON de métriques.
 *
 * FONCTIONNEMENT :
 * - Client reqwest avec timeout borné (config app_tree.timeout_ms)
 * - Statut non 2xx, timeout ou JSON invalide = TreeError
 * - Corps `null` = liste vide ; clés `Metric`/`Tags` acceptées
 * - NoTree quand aucun service n'est configuré
 */

use crate::models::BuiltinMetric;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TREE_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("tree service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("tree service answered {status} for {hostname}")]
    Status { status: reqwest::StatusCode, hostname: String },
}

/// Source des métriques liées à un hostname par le service d'arbre
#[async_trait]
pub trait TreeSource: Send + Sync {
    async fn query_metrics(&self, hostname: &str) -> Result<Vec<BuiltinMetric>, TreeError>;
}

#[derive(Clone)]
pub struct TreeClient {
    base: String,
    http: reqwest::Client,
}

impl TreeClient {
    pub fn new(addr: &str, timeout: Duration) -> Result<Self, TreeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("symbion-hbs")
            .build()?;
        Ok(Self { base: addr.trim_end_matches('/').to_string(), http })
    }
}

#[async_trait]
impl TreeSource for TreeClient {
    async fn query_metrics(&self, hostname: &str) -> Result<Vec<BuiltinMetric>, TreeError> {
        let url = format!("{}/api/v1/tree/metrics", self.base);
        let response = self.http.get(&url).query(&[("hostname", hostname)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TreeError::Status { status, hostname: hostname.to_string() });
        }

        // `null` = aucune métrique liée à l'hôte
        let metrics = response.json::<Option<Vec<BuiltinMetric>>>().await?.unwrap_or_default();
        debug!(hostname, count = metrics.len(), "tree metrics fetched");
        Ok(metrics)
    }
}

/// Utilisé quand aucun service d'arbre n'est configuré
pub struct NoTree;

#[async_trait]
impl TreeSource for NoTree {
    async fn query_metrics(&self, _hostname: &str) -> Result<Vec<BuiltinMetric>, TreeError> {
        Ok(Vec::new())
    }
}
