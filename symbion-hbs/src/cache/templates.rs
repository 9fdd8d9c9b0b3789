use crate::models::{TemplateId, TemplateMap};
use crate::ports::HbsPort;
use crate::state::Snapshot;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Nombre maximal de sauts parent autorisés lors d'une remontée d'héritage.
/// L'atteindre signale un cycle (ou une chaîne trop profonde) : la chaîne est abandonnée.
pub const MAX_INHERIT_DEPTH: usize = 10;

#[derive(Default)]
pub struct TemplateCache {
    map: Snapshot<TemplateMap>,
}

impl TemplateCache {
    pub fn init(&self, port: &dyn HbsPort) {
        match port.query_templates() {
            Ok(m) => {
                debug!(count = m.len(), "templates reloaded");
                self.map.replace(m);
            }
            Err(e) => warn!(port = port.name(), error = %e, "template query failed, keeping previous snapshot"),
        }
    }

    pub fn get_map(&self) -> Arc<TemplateMap> {
        self.map.load()
    }

    pub fn parent_ids(&self, tid: TemplateId) -> Vec<TemplateId> {
        parent_ids(&self.map.load(), tid)
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }
}

/// Chaîne d'héritage de `tid`, du template racine jusqu'à `tid` inclus.
///
/// La remontée suit `parent_id` tant que l'id est positif et connu. Au-delà de
/// [`MAX_INHERIT_DEPTH`] sauts, l'erreur est loggée et la chaîne est vide.
pub fn parent_ids(all_tpls: &TemplateMap, mut tid: TemplateId) -> Vec<TemplateId> {
    let mut ret = Vec::new();
    let mut depth = 0;
    while tid > 0 {
        let Some(t) = all_tpls.get(&tid) else { break };
        ret.push(tid);
        tid = t.parent_id;

        depth += 1;
        if depth == MAX_INHERIT_DEPTH {
            error!(template_id = tid, "template inherit cycle");
            return Vec::new();
        }
    }

    ret.reverse();
    ret
}
