/*!
 * Workload Generator
 * Seeded random process sets
 */

use crate::core::limits::{DEFAULT_MAX_ARRIVAL, DEFAULT_MAX_BURST, DEFAULT_MAX_PRIORITY};
use crate::core::types::{Priority, Tick};
use crate::process::Process;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ranges for generated processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSpec {
    /// Burst drawn from `1..=max_burst`
    pub max_burst: Tick,
    /// Arrival drawn from `0..=max_arrival`
    pub max_arrival: Tick,
    /// Priority drawn from `0..=max_priority`
    pub max_priority: Priority,
    /// Fixed seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GeneratorSpec {
    fn default() -> Self {
        Self {
            max_burst: DEFAULT_MAX_BURST,
            max_arrival: DEFAULT_MAX_ARRIVAL,
            max_priority: DEFAULT_MAX_PRIORITY,
            seed: None,
        }
    }
}

impl GeneratorSpec {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Generate `count` processes with PIDs `0..count`
pub fn generate_processes(count: usize, spec: &GeneratorSpec) -> Vec<Process> {
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let max_burst = spec.max_burst.max(1);

    let processes: Vec<Process> = (0..count)
        .map(|i| {
            let burst = rng.gen_range(1..=max_burst);
            let arrival = rng.gen_range(0..=spec.max_arrival);
            let priority = rng.gen_range(0..=spec.max_priority);
            Process::new(i as u32, priority, burst, arrival)
        })
        .collect();

    debug!(count, seed = ?spec.seed, "Generated workload");
    processes
}
