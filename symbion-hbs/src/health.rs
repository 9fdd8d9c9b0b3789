use crate::cache::HbsCaches;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Serialize, Deserialize)]
pub struct HbsHealth {
    pub uptime_seconds: u64,
    pub templates_cached: u32,
    pub strategies_cached: u32,
    pub hosts_cached: u32,
    pub last_reload: Option<String>, // RFC3339
    pub memory_usage_mb: f32,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self { start_time: Instant::now() }
    }

    pub fn get_health(&self, caches: &HbsCaches) -> HbsHealth {
        HbsHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            templates_cached: caches.templates.len() as u32,
            strategies_cached: caches.strategies.len() as u32,
            hosts_cached: caches.hosts.len() as u32,
            last_reload: caches.last_reload().and_then(|t| t.format(&Rfc3339).ok()),
            memory_usage_mb: get_memory_usage_mb(),
        }
    }
}

fn get_memory_usage_mb() -> f32 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let rss_kb = status
                .lines()
                .find(|l| l.starts_with("VmRSS:"))
                .and_then(|l| l.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok());
            if let Some(kb) = rss_kb {
                return (kb as f32) / 1024.0;
            }
        }
    }

    0.0
}
