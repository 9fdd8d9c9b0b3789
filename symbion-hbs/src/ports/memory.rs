/**
 * PORT MÉMOIRE - HbsPort de test
 *
 * Tables construites à la chaîne, pannes activables à chaud.
 */

use super::{parse_template_ids, HbsPort, PortError};
use crate::models::{BuiltinMetric, GroupId, HostId, StrategyMap, Template, TemplateId, TemplateMap};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct MemoryPort {
    templates: TemplateMap,
    hosts: HashMap<String, HostId>,
    host_groups: HashMap<HostId, Vec<GroupId>>,
    group_templates: HashMap<GroupId, Vec<TemplateId>>,
    builtin_metrics: Vec<(TemplateId, BuiltinMetric)>,
    fail_all: AtomicBool,
    fail_metrics: AtomicBool,
    pub last_metric_query: Mutex<Option<String>>,
}

impl MemoryPort {
    pub fn with_template(mut self, id: TemplateId, parent_id: TemplateId) -> Self {
        let tpl = Template { id, name: format!("tpl-{id}"), parent_id, action_id: 0, creator: "test".into() };
        self.templates.insert(id, tpl);
        self
    }

    pub fn with_host(mut self, hostname: &str, id: HostId) -> Self {
        self.hosts.insert(hostname.to_string(), id);
        self
    }

    pub fn with_host_group(mut self, hid: HostId, gid: GroupId) -> Self {
        self.host_groups.entry(hid).or_default().push(gid);
        self
    }

    pub fn with_group_template(mut self, gid: GroupId, tid: TemplateId) -> Self {
        self.group_templates.entry(gid).or_default().push(tid);
        self
    }

    pub fn with_builtin_metric(mut self, tid: TemplateId, metric: &str) -> Self {
        self.builtin_metrics.push((tid, BuiltinMetric::new(metric, "")));
        self
    }

    pub fn fail_queries(&self, on: bool) {
        self.fail_all.store(on, Ordering::SeqCst);
    }

    pub fn fail_metric_queries(&self, on: bool) {
        self.fail_metrics.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), PortError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(refused("memory port switched off"));
        }
        Ok(())
    }
}

fn refused(msg: &str) -> PortError {
    PortError::Io(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, msg.to_string()))
}

impl HbsPort for MemoryPort {
    fn name(&self) -> &str {
        "memory"
    }

    fn refresh(&self) -> Result<(), PortError> {
        self.check()
    }

    fn query_templates(&self) -> Result<TemplateMap, PortError> {
        self.check()?;
        Ok(self.templates.clone())
    }

    fn query_strategies(&self, _templates: &TemplateMap) -> Result<StrategyMap, PortError> {
        self.check()?;
        Ok(StrategyMap::new())
    }

    fn query_hosts(&self) -> Result<HashMap<String, HostId>, PortError> {
        self.check()?;
        Ok(self.hosts.clone())
    }

    fn query_host_groups(&self) -> Result<HashMap<HostId, Vec<GroupId>>, PortError> {
        self.check()?;
        Ok(self.host_groups.clone())
    }

    fn query_group_templates(&self) -> Result<HashMap<GroupId, Vec<TemplateId>>, PortError> {
        self.check()?;
        Ok(self.group_templates.clone())
    }

    fn query_builtin_metrics(&self, tids: &str) -> Result<Vec<BuiltinMetric>, PortError> {
        *self.last_metric_query.lock() = Some(tids.to_string());
        self.check()?;
        if self.fail_metrics.load(Ordering::SeqCst) {
            return Err(refused("builtin metric table locked"));
        }
        let mut out = Vec::new();
        for tid in parse_template_ids(tids)? {
            out.extend(self.builtin_metrics.iter().filter(|(t, _)| *t == tid).map(|(_, m)| m.clone()));
        }
        Ok(out)
    }
}
