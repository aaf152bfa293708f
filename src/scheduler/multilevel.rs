/*!
 * Multilevel Queue Scheduler
 * Fixed priority bands, each served round robin with its own quantum
 */

use super::config::SchedulerConfig;
use super::core::SchedulerCore;
use super::traits::Scheduler;
use super::types::SchedulerType;
use crate::core::limits::{INTERACTIVE_BAND_MAX_PRIORITY, SYSTEM_BAND_MAX_PRIORITY};
use crate::core::types::{Priority, QueueLevel, Slot, Tick};
use crate::process::Process;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Band a queue serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueClass {
    System,
    Interactive,
    Batch,
}

/// Per-queue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub class: QueueClass,
    pub quantum: Tick,
    /// Advisory only; dispatch never preempts across bands mid-slice
    pub preemptive: bool,
    pub name: String,
}

impl QueueConfig {
    /// Default layout for level `index` given the base quantum
    pub fn for_level(index: QueueLevel, base_quantum: Tick) -> Self {
        match index {
            0 => Self {
                class: QueueClass::System,
                quantum: (base_quantum / 2).max(1),
                preemptive: true,
                name: "System".to_string(),
            },
            1 => Self {
                class: QueueClass::Interactive,
                quantum: base_quantum,
                preemptive: true,
                name: "Interactive".to_string(),
            },
            n => Self {
                class: QueueClass::Batch,
                quantum: base_quantum.saturating_mul(2),
                preemptive: false,
                name: format!("Batch-{}", n - 1),
            },
        }
    }
}

/// Multilevel Queue scheduler
///
/// A process is bound to one band at insertion and never moves. The lowest
/// non-empty band is always served first, so lower bands may starve.
#[derive(Debug, Clone)]
pub struct MultilevelQueueScheduler {
    core: SchedulerCore,
    queue_configs: Vec<QueueConfig>,
    queues: Vec<VecDeque<Slot>>,
}

impl MultilevelQueueScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let levels = config.effective_num_queues();
        let base = config.effective_quantum();
        let queue_configs = (0..levels)
            .map(|level| QueueConfig::for_level(level, base))
            .collect();

        Self {
            core: SchedulerCore::new(config),
            queue_configs,
            queues: vec![VecDeque::new(); levels],
        }
    }

    #[inline]
    pub fn num_queues(&self) -> usize {
        self.queue_configs.len()
    }

    /// Band for a priority value
    pub fn assign_band(&self, priority: Priority) -> QueueLevel {
        let levels = self.num_queues();
        if priority <= SYSTEM_BAND_MAX_PRIORITY {
            0
        } else if priority <= INTERACTIVE_BAND_MAX_PRIORITY && levels > 1 {
            1
        } else {
            levels - 1
        }
    }

    pub fn queue_config(&self, index: QueueLevel) -> Option<&QueueConfig> {
        self.queue_configs.get(index)
    }

    pub fn queue_configs(&self) -> &[QueueConfig] {
        &self.queue_configs
    }

    /// Replace the settings of one queue; false if the index is out of range
    ///
    /// A zero quantum is raised to one tick.
    pub fn set_queue_config(&mut self, index: QueueLevel, mut config: QueueConfig) -> bool {
        let Some(slot) = self.queue_configs.get_mut(index) else {
            return false;
        };
        config.quantum = config.quantum.max(1);
        debug!(index, name = %config.name, quantum = config.quantum, "Queue reconfigured");
        *slot = config;
        true
    }

    /// Ready processes currently waiting in queue `index`
    pub fn queue_len(&self, index: QueueLevel) -> usize {
        self.queues.get(index).map_or(0, VecDeque::len)
    }

    fn assign_all_bands(&mut self) {
        for slot in 0..self.core.processes().len() {
            let band = self.assign_band(self.core.process(slot).priority());
            self.core.process_mut(slot).set_queue_level(band);
        }
    }

    fn admit_arrivals(&mut self) {
        let now = self.core.now();
        for slot in self.core.check_arrivals(now) {
            let level = self.core.process(slot).queue_level();
            self.queues[level].push_back(slot);
        }
    }

    fn highest_ready_level(&self) -> Option<QueueLevel> {
        self.queues.iter().position(|q| !q.is_empty())
    }
}

impl Scheduler for MultilevelQueueScheduler {
    fn name(&self) -> &'static str {
        SchedulerType::MultilevelQueue.display_name()
    }

    fn kind(&self) -> SchedulerType {
        SchedulerType::MultilevelQueue
    }

    fn core(&self) -> &SchedulerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SchedulerCore {
        &mut self.core
    }

    fn add_process(&mut self, process: Process) {
        let band = self.assign_band(process.priority());
        let slot = self.core.add_process(process);
        self.core.process_mut(slot).set_queue_level(band);
    }

    fn reset(&mut self) {
        self.core.reset();
        self.assign_all_bands();
        for queue in &mut self.queues {
            queue.clear();
        }
    }

    fn run(&mut self) {
        self.reset();
        info!(
            algorithm = self.name(),
            processes = self.core.processes().len(),
            queues = self.num_queues(),
            "Starting simulation"
        );

        self.admit_arrivals();

        while !self.core.is_complete() {
            let Some(level) = self.highest_ready_level() else {
                let advanced = self.core.idle_until_next_arrival();
                assert!(advanced, "All queues empty with no pending arrivals");
                self.admit_arrivals();
                continue;
            };

            let Some(slot) = self.queues[level].pop_front() else {
                continue;
            };
            let quantum = self.queue_configs[level].quantum.max(1);
            self.core.dispatch(slot, quantum, Some(level));

            self.admit_arrivals();

            let now = self.core.now();
            let process = self.core.process_mut(slot);
            if !process.is_terminated() {
                process.preempt(now);
                self.queues[level].push_back(slot);
            }
        }

        self.core.calculate_metrics();
        info!(
            algorithm = self.name(),
            total_time = self.core.now(),
            context_switches = self.core.context_switches(),
            "Simulation complete"
        );
    }

    fn next_process(&self) -> Option<&Process> {
        let level = self.highest_ready_level()?;
        self.queues[level]
            .front()
            .map(|&slot| self.core.process(slot))
    }
}
