/*!
 * Scheduler Configuration
 * Tunables shared by every dispatch policy
 */

use crate::core::errors::{SimulationError, SimulationResult};
use crate::core::limits::{
    BOOST_INTERVAL_MULTIPLIER, DEFAULT_AGING_THRESHOLD, DEFAULT_CONTEXT_SWITCH_COST,
    DEFAULT_NUM_QUEUES, DEFAULT_TIME_QUANTUM,
};
use crate::core::types::{QueueLevel, Tick};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variables consulted by [`SchedulerConfig::with_overrides`]
pub const ENV_TIME_QUANTUM: &str = "SCHED_TIME_QUANTUM";
pub const ENV_CONTEXT_SWITCH_COST: &str = "SCHED_CONTEXT_SWITCH_COST";
pub const ENV_NUM_QUEUES: &str = "SCHED_NUM_QUEUES";
pub const ENV_AGING_ENABLED: &str = "SCHED_AGING_ENABLED";
pub const ENV_AGING_THRESHOLD: &str = "SCHED_AGING_THRESHOLD";
pub const ENV_BOOST_INTERVAL: &str = "SCHED_BOOST_INTERVAL";

/// Scheduler configuration
///
/// Read-only input for every algorithm. Missing fields in serialized form
/// fall back to the defaults in [`crate::core::limits`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Base time quantum
    pub time_quantum: Tick,
    /// Clock ticks charged per context switch
    pub context_switch_cost: Tick,
    /// Number of levels for multilevel policies
    pub num_queues: usize,
    /// Explicit per-level quanta for MLFQ, see [`SchedulerConfig::level_quantums`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quantums: Vec<Tick>,
    pub aging_enabled: bool,
    /// Unserved ticks before a ready process is aged one priority step
    pub aging_threshold: Tick,
    /// MLFQ boost period; `None` derives it from the aging threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_interval: Option<Tick>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_quantum: DEFAULT_TIME_QUANTUM,
            context_switch_cost: DEFAULT_CONTEXT_SWITCH_COST,
            num_queues: DEFAULT_NUM_QUEUES,
            quantums: Vec::new(),
            aging_enabled: true,
            aging_threshold: DEFAULT_AGING_THRESHOLD,
            boost_interval: None,
        }
    }
}

impl SchedulerConfig {
    pub fn with_time_quantum(mut self, quantum: Tick) -> Self {
        self.time_quantum = quantum;
        self
    }

    pub fn with_context_switch_cost(mut self, cost: Tick) -> Self {
        self.context_switch_cost = cost;
        self
    }

    pub fn with_num_queues(mut self, num_queues: usize) -> Self {
        self.num_queues = num_queues;
        self
    }

    pub fn with_quantums(mut self, quantums: Vec<Tick>) -> Self {
        self.quantums = quantums;
        self
    }

    pub fn with_aging(mut self, enabled: bool, threshold: Tick) -> Self {
        self.aging_enabled = enabled;
        self.aging_threshold = threshold;
        self
    }

    pub fn with_boost_interval(mut self, interval: Tick) -> Self {
        self.boost_interval = Some(interval);
        self
    }

    /// Base quantum, never zero
    #[inline]
    pub fn effective_quantum(&self) -> Tick {
        if self.time_quantum > 0 {
            self.time_quantum
        } else {
            DEFAULT_TIME_QUANTUM
        }
    }

    /// Number of queue levels, never zero
    #[inline]
    pub fn effective_num_queues(&self) -> usize {
        self.num_queues.max(1)
    }

    /// MLFQ priority boost period, saturating for very large thresholds
    pub fn boost_interval(&self) -> Tick {
        self.boost_interval
            .unwrap_or_else(|| self.aging_threshold.saturating_mul(BOOST_INTERVAL_MULTIPLIER))
    }

    /// Per-level quanta for `levels` feedback levels
    ///
    /// Precedence, per index: an explicit positive entry in `quantums` wins;
    /// otherwise the computed default applies, `base * 2^level`. Entries
    /// beyond `levels` are ignored.
    pub fn level_quantums(&self, levels: usize) -> Vec<Tick> {
        let base = self.effective_quantum();
        (0..levels)
            .map(|level: QueueLevel| {
                let computed = base.saturating_mul(1 << level.min(62));
                match self.quantums.get(level) {
                    Some(&explicit) if explicit > 0 => explicit,
                    _ => computed,
                }
            })
            .collect()
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> SimulationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::Configuration(format!("invalid config: {}", e)))
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), ?config, "Loaded scheduler configuration");
        Ok(config)
    }

    /// Apply `SCHED_*` overrides from the process environment
    pub fn apply_env(self) -> SimulationResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> SimulationResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(&lookup, ENV_TIME_QUANTUM)? {
            self.time_quantum = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_CONTEXT_SWITCH_COST)? {
            self.context_switch_cost = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_NUM_QUEUES)? {
            self.num_queues = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_AGING_ENABLED)? {
            self.aging_enabled = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_AGING_THRESHOLD)? {
            self.aging_threshold = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_BOOST_INTERVAL)? {
            self.boost_interval = Some(v);
        }
        Ok(self)
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> SimulationResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => {
            let value = raw.trim().parse::<T>().map_err(|e| {
                SimulationError::Configuration(format!("{}={:?}: {}", key, raw, e))
            })?;
            debug!(key, value = %raw.trim(), "Configuration override applied");
            Ok(Some(value))
        }
    }
}
