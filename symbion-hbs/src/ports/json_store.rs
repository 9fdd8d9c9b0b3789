/**
 * PORT JSON STORE - Source de données HBS sur fichier JSON
 *
 * RÔLE :
 * Expose les tables consommées par les caches (templates, stratégies,
 * hôtes, groupes, métriques builtin) à partir d'un dump JSON.
 *
 * FONCTIONNEMENT :
 * - Le dump est chargé en mémoire au démarrage (cache parking_lot)
 * - refresh() relit le fichier ; en cas d'erreur l'ancienne vue est conservée
 * - Les tables de liaison suivent le format des tables SQL (une ligne par paire)
 *
 * DONNÉES EXEMPLE :
 * ```json
 * {
 *   "templates": [{"id": 5, "name": "base"}, {"id": 10, "name": "web", "parent_id": 5}],
 *   "hosts": [{"id": 1, "hostname": "h1"}],
 *   "host_groups": [{"host_id": 1, "group_id": 1}],
 *   "group_templates": [{"group_id": 1, "tpl_id": 10}],
 *   "builtin_metrics": [{"tpl_id": 5, "metric": "net.port.listen", "tags": "port=22"}]
 * }
 * ```
 */

use super::{parse_template_ids, HbsPort, PortError};
use crate::models::{BuiltinMetric, GroupId, HostId, Strategy, StrategyMap, Template, TemplateId, TemplateMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HbsDump {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    #[serde(default)]
    pub hosts: Vec<HostRow>,
    #[serde(default)]
    pub host_groups: Vec<HostGroupRow>,
    #[serde(default)]
    pub group_templates: Vec<GroupTemplateRow>,
    #[serde(default)]
    pub builtin_metrics: Vec<BuiltinMetricRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRow {
    pub id: HostId,
    pub hostname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostGroupRow {
    pub host_id: HostId,
    pub group_id: GroupId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTemplateRow {
    pub group_id: GroupId,
    pub tpl_id: TemplateId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinMetricRow {
    pub tpl_id: TemplateId,
    pub metric: String,
    #[serde(default)]
    pub tags: String,
}

pub struct JsonStorePort {
    storage_path: PathBuf,
    dump: parking_lot::Mutex<HbsDump>,
}

impl JsonStorePort {
    /// Ouvre le dump ; un fichier absent donne une base vide
    pub fn new<P: Into<PathBuf>>(storage_path: P) -> Result<Self, PortError> {
        let port = Self {
            storage_path: storage_path.into(),
            dump: parking_lot::Mutex::new(HbsDump::default()),
        };
        port.load_from_disk()?;
        info!(path = %port.storage_path.display(), "json store opened");
        Ok(port)
    }

    fn load_from_disk(&self) -> Result<(), PortError> {
        if !self.storage_path.exists() {
            debug!(path = %self.storage_path.display(), "no dump on disk, using empty store");
            *self.dump.lock() = HbsDump::default();
            return Ok(());
        }

        let content = fs::read_to_string(&self.storage_path)?;
        let dump: HbsDump = serde_json::from_str(&content)?;
        *self.dump.lock() = dump;
        Ok(())
    }
}

impl HbsPort for JsonStorePort {
    fn name(&self) -> &str {
        "json-store"
    }

    fn refresh(&self) -> Result<(), PortError> {
        self.load_from_disk()
    }

    fn query_templates(&self) -> Result<TemplateMap, PortError> {
        let dump = self.dump.lock();
        Ok(dump.templates.iter().map(|t| (t.id, t.clone())).collect())
    }

    fn query_strategies(&self, templates: &TemplateMap) -> Result<StrategyMap, PortError> {
        let dump = self.dump.lock();
        let mut out = StrategyMap::new();
        for s in &dump.strategies {
            // stratégie orpheline : son template n'est pas chargé
            let Some(tpl) = templates.get(&s.tpl_id) else { continue };
            let mut strategy = s.clone();
            strategy.tpl = Some(tpl.clone());
            out.insert(strategy.id, strategy);
        }
        Ok(out)
    }

    fn query_hosts(&self) -> Result<HashMap<String, HostId>, PortError> {
        let dump = self.dump.lock();
        Ok(dump.hosts.iter().map(|h| (h.hostname.clone(), h.id)).collect())
    }

    fn query_host_groups(&self) -> Result<HashMap<HostId, Vec<GroupId>>, PortError> {
        let dump = self.dump.lock();
        let mut out: HashMap<HostId, Vec<GroupId>> = HashMap::new();
        for row in &dump.host_groups {
            out.entry(row.host_id).or_default().push(row.group_id);
        }
        Ok(out)
    }

    fn query_group_templates(&self) -> Result<HashMap<GroupId, Vec<TemplateId>>, PortError> {
        let dump = self.dump.lock();
        let mut out: HashMap<GroupId, Vec<TemplateId>> = HashMap::new();
        for row in &dump.group_templates {
            out.entry(row.group_id).or_default().push(row.tpl_id);
        }
        Ok(out)
    }

    fn query_builtin_metrics(&self, tids: &str) -> Result<Vec<BuiltinMetric>, PortError> {
        let ids = parse_template_ids(tids)?;
        let dump = self.dump.lock();
        let mut out = Vec::new();
        for tid in ids {
            out.extend(
                dump.builtin_metrics
                    .iter()
                    .filter(|row| row.tpl_id == tid)
                    .map(|row| BuiltinMetric::new(&row.metric, &row.tags)),
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DUMP: &str = r#"{
        "templates": [
            {"id": 5, "name": "base"},
            {"id": 10, "name": "web", "parent_id": 5}
        ],
        "strategies": [
            {"id": 1, "metric": "cpu.idle", "tpl_id": 5, "operator": "<", "right_value": 10.0},
            {"id": 2, "metric": "mem.used", "tpl_id": 99}
        ],
        "hosts": [{"id": 1, "hostname": "h1"}],
        "host_groups": [{"host_id": 1, "group_id": 1}, {"host_id": 1, "group_id": 2}],
        "group_templates": [{"group_id": 1, "tpl_id": 10}],
        "builtin_metrics": [
            {"tpl_id": 10, "metric": "m2"},
            {"tpl_id": 5, "metric": "m1", "tags": "port=22"}
        ]
    }"#;

    fn store_with(content: &str) -> (tempfile::NamedTempFile, JsonStorePort) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let port = JsonStorePort::new(file.path()).unwrap();
        (file, port)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let port = JsonStorePort::new(dir.path().join("absent.json")).unwrap();
        assert!(port.query_templates().unwrap().is_empty());
        assert!(port.query_builtin_metrics("1,2").unwrap().is_empty());
    }

    #[test]
    fn test_strategies_scoped_to_templates() {
        let (_file, port) = store_with(DUMP);
        let templates = port.query_templates().unwrap();
        let strategies = port.query_strategies(&templates).unwrap();
        assert_eq!(strategies.len(), 1);
        let s = &strategies[&1];
        assert_eq!(s.tpl.as_ref().map(|t| t.name.as_str()), Some("base"));
    }

    #[test]
    fn test_membership_tables() {
        let (_file, port) = store_with(DUMP);
        assert_eq!(port.query_hosts().unwrap().get("h1"), Some(&1));
        assert_eq!(port.query_host_groups().unwrap()[&1], vec![1, 2]);
        assert_eq!(port.query_group_templates().unwrap()[&1], vec![10]);
    }

    #[test]
    fn test_builtin_metrics_follow_query_order() {
        let (_file, port) = store_with(DUMP);
        let metrics = port.query_builtin_metrics("5,10").unwrap();
        assert_eq!(metrics, vec![BuiltinMetric::new("m1", "port=22"), BuiltinMetric::new("m2", "")]);
        assert!(matches!(port.query_builtin_metrics("5,abc"), Err(PortError::InvalidQuery(_))));
    }

    #[test]
    fn test_refresh_keeps_view_on_bad_file() {
        let (file, port) = store_with(DUMP);
        fs::write(file.path(), "{ not json").unwrap();
        assert!(matches!(port.refresh(), Err(PortError::Serialization(_))));
        assert_eq!(port.query_templates().unwrap().len(), 2);
    }
}
