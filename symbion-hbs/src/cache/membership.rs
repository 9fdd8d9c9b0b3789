/**
 * INDEX D'APPARTENANCE - hôtes, groupes et liaisons groupe/template
 *
 * RÔLE :
 * Répond aux trois questions du chemin heartbeat : id d'un hostname, groupes
 * d'un hôte, templates liés à un groupe.
 *
 * FONCTIONNEMENT :
 * - Une snapshot par table, remplacée en entier par init()
 * - Les lectures rendent `Option` : une absence est un cas normal, jamais une erreur
 */

use crate::models::{GroupId, HostId, TemplateId};
use crate::ports::HbsPort;
use crate::state::Snapshot;
use std::collections::HashMap;
use tracing::{debug, warn};

/// hostname -> host id
#[derive(Default)]
pub struct HostMap {
    map: Snapshot<HashMap<String, HostId>>,
}

impl HostMap {
    pub fn init(&self, port: &dyn HbsPort) {
        match port.query_hosts() {
            Ok(m) => {
                debug!(count = m.len(), "hosts reloaded");
                self.map.replace(m);
            }
            Err(e) => warn!(port = port.name(), error = %e, "host query failed, keeping previous snapshot"),
        }
    }

    pub fn get_id(&self, hostname: &str) -> Option<HostId> {
        self.map.load().get(hostname).copied()
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }
}

/// host id -> group ids
#[derive(Default)]
pub struct HostGroupsMap {
    map: Snapshot<HashMap<HostId, Vec<GroupId>>>,
}

impl HostGroupsMap {
    pub fn init(&self, port: &dyn HbsPort) {
        match port.query_host_groups() {
            Ok(m) => self.map.replace(m),
            Err(e) => warn!(port = port.name(), error = %e, "host group query failed, keeping previous snapshot"),
        }
    }

    pub fn get_group_ids(&self, hid: HostId) -> Option<Vec<GroupId>> {
        self.map.load().get(&hid).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }
}

/// group id -> template ids
#[derive(Default)]
pub struct GroupTemplates {
    map: Snapshot<HashMap<GroupId, Vec<TemplateId>>>,
}

impl GroupTemplates {
    pub fn init(&self, port: &dyn HbsPort) {
        match port.query_group_templates() {
            Ok(m) => self.map.replace(m),
            Err(e) => warn!(port = port.name(), error = %e, "group template query failed, keeping previous snapshot"),
        }
    }

    pub fn get_template_ids(&self, gid: GroupId) -> Option<Vec<TemplateId>> {
        self.map.load().get(&gid).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }
}
