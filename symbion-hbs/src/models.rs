use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type HostId = i64;
pub type GroupId = i64;
pub type TemplateId = i64;
pub type StrategyId = i64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Template {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_id: TemplateId, // 0 = racine
    #[serde(default)]
    pub action_id: i64,
    #[serde(default)]
    pub creator: String,
}

/// Règle de surveillance rattachée à un template
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Strategy {
    pub id: StrategyId,
    pub metric: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub func: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub right_value: f64,
    #[serde(default)]
    pub max_step: i32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub run_begin: String,
    #[serde(default)]
    pub run_end: String,
    pub tpl_id: TemplateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpl: Option<Template>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BuiltinMetric {
    #[serde(alias = "Metric")]
    pub metric: String,
    #[serde(default, alias = "Tags")]
    pub tags: String, // "k1=v1,k2=v2"
}

impl BuiltinMetric {
    pub fn new(metric: &str, tags: &str) -> Self {
        Self { metric: metric.to_string(), tags: tags.to_string() }
    }
}

pub type TemplateMap = HashMap<TemplateId, Template>;
pub type StrategyMap = HashMap<StrategyId, Strategy>;
