/**
 * CACHES HBS - Tables en mémoire pour le chemin heartbeat
 *
 * RÔLE :
 * Regroupe les snapshots consultées à chaque heartbeat : templates,
 * stratégies, hôtes, groupes d'hôtes et liaisons groupe/template.
 *
 * FONCTIONNEMENT :
 * - Chaque cache publie une snapshot complète (jamais modifiée en place)
 * - reload() recharge tout dans l'ordre des dépendances
 * - Une requête en échec garde l'ancienne snapshot (disponibilité > fraîcheur)
 * - spawn_cache_refresher() relance reload() à intervalle fixe
 */

pub mod membership;
pub mod strategies;
pub mod templates;

pub use membership::{GroupTemplates, HostGroupsMap, HostMap};
pub use strategies::StrategyCache;
pub use templates::{parent_ids, TemplateCache};

use crate::ports::HbsPort;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::task;
use tracing::{info, warn};

#[derive(Default)]
pub struct HbsCaches {
    pub templates: TemplateCache,
    pub strategies: StrategyCache,
    pub hosts: HostMap,
    pub host_groups: HostGroupsMap,
    pub group_templates: GroupTemplates,
    last_reload: Mutex<Option<OffsetDateTime>>,
}

impl HbsCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recharge toutes les tables. Les stratégies sont scopées sur la
    /// snapshot de templates qui vient d'être publiée.
    pub fn reload(&self, port: &dyn HbsPort) {
        if let Err(e) = port.refresh() {
            warn!(port = port.name(), error = %e, "port refresh failed, reloading from its current view");
        }

        self.templates.init(port);
        let tpls = self.templates.get_map();
        self.strategies.init(port, &tpls);
        self.hosts.init(port);
        self.host_groups.init(port);
        self.group_templates.init(port);

        *self.last_reload.lock() = Some(OffsetDateTime::now_utc());
        info!(
            templates = self.templates.len(),
            strategies = self.strategies.len(),
            hosts = self.hosts.len(),
            host_groups = self.host_groups.len(),
            group_templates = self.group_templates.len(),
            "caches reloaded"
        );
    }

    pub fn last_reload(&self) -> Option<OffsetDateTime> {
        *self.last_reload.lock()
    }
}

/// Démarre le rechargement périodique des caches
pub fn spawn_cache_refresher(
    caches: Arc<HbsCaches>,
    port: Arc<dyn HbsPort + Send + Sync>,
    every: Duration,
) -> task::JoinHandle<()> {
    task::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // le premier tick est immédiat : le chargement initial est fait par main
        interval.tick().await;

        loop {
            interval.tick().await;
            let caches = caches.clone();
            let port = port.clone();
            if let Err(e) = task::spawn_blocking(move || caches.reload(port.as_ref())).await {
                warn!(error = %e, "cache reload task panicked");
            }
        }
    })
}
