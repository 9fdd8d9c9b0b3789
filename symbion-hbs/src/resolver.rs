/**
 * RÉSOLUTION DES MÉTRIQUES BUILTIN - Chemin heartbeat
 *
 * RÔLE :
 * Calcule la liste des métriques builtin qu'un hôte doit remonter.
 *
 * FONCTIONNEMENT :
 * - hôte -> groupes -> templates -> templates parents = ensemble d'ids trié
 * - requête des métriques sur la source de données ("5,10,12")
 * - ajout des métriques liées directement au hostname par le service d'arbre
 * - concaténation telle quelle : les doublons sont conservés
 * - une erreur de l'une ou l'autre source annule tout (pas de liste partielle)
 */

use crate::cache::{parent_ids, HbsCaches};
use crate::models::{BuiltinMetric, TemplateId};
use crate::ports::{HbsPort, PortError};
use crate::tree::{TreeError, TreeSource};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("builtin metric query failed: {0}")]
    Store(#[from] PortError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

#[derive(Clone)]
pub struct MetricResolver {
    caches: Arc<HbsCaches>,
    port: Arc<dyn HbsPort + Send + Sync>,
    tree: Arc<dyn TreeSource>,
}

impl MetricResolver {
    pub fn new(caches: Arc<HbsCaches>, port: Arc<dyn HbsPort + Send + Sync>, tree: Arc<dyn TreeSource>) -> Self {
        Self { caches, port, tree }
    }

    /// Ids des templates liés à l'hôte, héritage compris, triés par id.
    /// `None` quand l'hôte n'a aucun template.
    pub fn template_ids(&self, hostname: &str) -> Option<BTreeSet<TemplateId>> {
        let hid = self.caches.hosts.get_id(hostname)?;
        let gids = self.caches.host_groups.get_group_ids(hid)?;

        // templates liés aux groupes de l'hôte
        let mut tids = BTreeSet::new();
        for gid in gids {
            let Some(bound) = self.caches.group_templates.get_template_ids(gid) else { continue };
            tids.extend(bound);
        }
        if tids.is_empty() {
            return None;
        }

        let all_tpls = self.caches.templates.get_map();
        let direct: Vec<TemplateId> = tids.iter().copied().collect();
        for tid in direct {
            tids.extend(parent_ids(&all_tpls, tid));
        }
        Some(tids)
    }

    pub async fn get_builtin_metrics(&self, hostname: &str) -> Result<Vec<BuiltinMetric>, ResolveError> {
        let Some(tids) = self.template_ids(hostname) else {
            debug!(hostname, "no template bound to host");
            return Ok(Vec::new());
        };

        let joined = tids.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(",");
        let from_store = self.port.query_builtin_metrics(&joined)?;
        let from_tree = self.tree.query_metrics(hostname).await?;

        debug!(hostname, tids = %joined, store = from_store.len(), tree = from_tree.len(), "builtin metrics resolved");
        let mut metrics = from_store;
        metrics.extend(from_tree);
        Ok(metrics)
    }
}
