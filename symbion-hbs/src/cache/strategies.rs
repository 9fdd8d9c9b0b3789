use crate::models::{StrategyMap, TemplateMap};
use crate::ports::HbsPort;
use crate::state::Snapshot;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Default)]
pub struct StrategyCache {
    map: Snapshot<StrategyMap>,
}

impl StrategyCache {
    /// Recharge les stratégies des templates donnés.
    /// Une erreur de requête conserve la snapshot précédente.
    pub fn init(&self, port: &dyn HbsPort, templates: &TemplateMap) {
        match port.query_strategies(templates) {
            Ok(m) => {
                debug!(count = m.len(), "strategies reloaded");
                self.map.replace(m);
            }
            Err(e) => warn!(port = port.name(), error = %e, "strategy query failed, keeping previous snapshot"),
        }
    }

    pub fn get_map(&self) -> Arc<StrategyMap> {
        self.map.load()
    }

    pub fn len(&self) -> usize {
        self.map.load().len()
    }
}
