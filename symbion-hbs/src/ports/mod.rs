/**
 * DATA PORT HBS - Interface vers la source de données des caches
 *
 * RÔLE :
 * Ce module définit le contrat que le serveur heartbeat consomme pour remplir
 * ses caches : templates, stratégies, appartenance hôte/groupe, liaisons
 * groupe/template et métriques builtin.
 *
 * FONCTIONNEMENT :
 * - HbsPort trait = interface commune (une requête par table)
 * - PortError = erreurs d'E/S, de format ou de requête
 * - JsonStorePort = implémentation sur un dump JSON (voir json_store.rs)
 *
 * Les caches ne connaissent que ce trait : un backend SQL peut le remplacer
 * sans toucher au reste du kernel.
 */

pub mod json_store;
#[cfg(test)]
pub mod memory;

pub use json_store::JsonStorePort;

use crate::models::{BuiltinMetric, GroupId, HostId, StrategyMap, TemplateId, TemplateMap};
use std::collections::HashMap;

/// Erreurs possibles lors des requêtes sur la source de données
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source des tables chargées dans les caches HBS
pub trait HbsPort {
    /// Nom court pour les logs
    fn name(&self) -> &str;

    /// Rafraîchit la vue du backend avant un rechargement complet des caches
    fn refresh(&self) -> Result<(), PortError> {
        Ok(())
    }

    fn query_templates(&self) -> Result<TemplateMap, PortError>;

    /// Stratégies dont le template figure dans `templates`, template attaché
    fn query_strategies(&self, templates: &TemplateMap) -> Result<StrategyMap, PortError>;

    /// hostname -> host id
    fn query_hosts(&self) -> Result<HashMap<String, HostId>, PortError>;

    /// host id -> group ids
    fn query_host_groups(&self) -> Result<HashMap<HostId, Vec<GroupId>>, PortError>;

    /// group id -> template ids
    fn query_group_templates(&self) -> Result<HashMap<GroupId, Vec<TemplateId>>, PortError>;

    /// Métriques builtin liées aux templates `tids` ("5,10,12")
    fn query_builtin_metrics(&self, tids: &str) -> Result<Vec<BuiltinMetric>, PortError>;
}

/// Parse une liste d'ids séparés par des virgules, dans l'ordre donné
pub fn parse_template_ids(tids: &str) -> Result<Vec<TemplateId>, PortError> {
    tids.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<TemplateId>()
                .map_err(|e| PortError::InvalidQuery(format!("bad template id '{}': {}", s, e)))
        })
        .collect()
}
