/*!
 * Multilevel Feedback Queue Scheduler
 * Demotion on quantum exhaustion with periodic priority boost
 */

use super::config::SchedulerConfig;
use super::core::SchedulerCore;
use super::traits::Scheduler;
use super::types::SchedulerType;
use crate::core::types::{QueueLevel, Slot, Tick};
use crate::process::Process;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Multilevel Feedback Queue scheduler
///
/// Every process enters at level 0. Burning a whole level quantum with
/// work left demotes one level, clamped at the last. When aging is enabled,
/// every `boost_interval` ticks all unfinished processes return to level 0.
#[derive(Debug, Clone)]
pub struct MultilevelFeedbackQueueScheduler {
    core: SchedulerCore,
    quantums: Vec<Tick>,
    queues: Vec<VecDeque<Slot>>,
    aging_enabled: bool,
    boost_interval: Tick,
    last_boost: Tick,
}

impl MultilevelFeedbackQueueScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let levels = config.effective_num_queues();
        let quantums = config.level_quantums(levels);
        let aging_enabled = config.aging_enabled;
        let boost_interval = config.boost_interval();

        Self {
            core: SchedulerCore::new(config),
            quantums,
            queues: vec![VecDeque::new(); levels],
            aging_enabled,
            boost_interval,
            last_boost: 0,
        }
    }

    #[inline]
    pub fn num_levels(&self) -> usize {
        self.quantums.len()
    }

    pub fn quantums(&self) -> &[Tick] {
        &self.quantums
    }

    pub fn quantum(&self, level: QueueLevel) -> Option<Tick> {
        self.quantums.get(level).copied()
    }

    /// Override one level's quantum; false for a bad level or zero quantum
    pub fn set_quantum(&mut self, level: QueueLevel, quantum: Tick) -> bool {
        if quantum == 0 {
            return false;
        }
        match self.quantums.get_mut(level) {
            Some(q) => {
                *q = quantum;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_aging_enabled(&self) -> bool {
        self.aging_enabled
    }

    pub fn set_aging_enabled(&mut self, enabled: bool) {
        self.aging_enabled = enabled;
    }

    #[inline]
    pub fn boost_interval(&self) -> Tick {
        self.boost_interval
    }

    pub fn set_boost_interval(&mut self, interval: Tick) {
        self.boost_interval = interval;
    }

    pub fn queue_len(&self, level: QueueLevel) -> usize {
        self.queues.get(level).map_or(0, VecDeque::len)
    }

    /// Move every unfinished process back to level 0
    ///
    /// Ready processes keep their relative order, higher levels first.
    pub fn priority_boost(&mut self) {
        let now = self.core.now();
        let mut drained: VecDeque<Slot> = VecDeque::new();
        for queue in &mut self.queues {
            drained.extend(queue.drain(..));
        }
        self.queues[0] = drained;

        for slot in 0..self.core.processes().len() {
            let process = self.core.process_mut(slot);
            if !process.is_terminated() {
                process.set_queue_level(0);
            }
        }

        self.last_boost = now;
        debug!(now, ready = self.queues[0].len(), "Priority boost");
    }

    fn boost_due(&self) -> bool {
        self.aging_enabled && self.core.now().saturating_sub(self.last_boost) >= self.boost_interval
    }

    fn admit_arrivals(&mut self) {
        let now = self.core.now();
        for slot in self.core.check_arrivals(now) {
            self.core.process_mut(slot).set_queue_level(0);
            self.queues[0].push_back(slot);
        }
    }

    fn highest_ready_level(&self) -> Option<QueueLevel> {
        self.queues.iter().position(|q| !q.is_empty())
    }
}

impl Scheduler for MultilevelFeedbackQueueScheduler {
    fn name(&self) -> &'static str {
        SchedulerType::MultilevelFeedbackQueue.display_name()
    }

    fn kind(&self) -> SchedulerType {
        SchedulerType::MultilevelFeedbackQueue
    }

    fn core(&self) -> &SchedulerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SchedulerCore {
        &mut self.core
    }

    fn reset(&mut self) {
        self.core.reset();
        for queue in &mut self.queues {
            queue.clear();
        }
        self.last_boost = 0;
    }

    fn run(&mut self) {
        self.reset();
        info!(
            algorithm = self.name(),
            processes = self.core.processes().len(),
            quantums = ?self.quantums,
            boost_interval = self.boost_interval,
            "Starting simulation"
        );

        self.admit_arrivals();
        let last_level = self.num_levels() - 1;

        while !self.core.is_complete() {
            if self.boost_due() {
                self.priority_boost();
            }

            let Some(level) = self.highest_ready_level() else {
                let advanced = self.core.idle_until_next_arrival();
                assert!(advanced, "All levels empty with no pending arrivals");
                self.admit_arrivals();
                continue;
            };

            let Some(slot) = self.queues[level].pop_front() else {
                continue;
            };
            let quantum = self.quantums[level];
            let used = self.core.dispatch(slot, quantum, Some(level));

            self.admit_arrivals();

            let now = self.core.now();
            let process = self.core.process_mut(slot);
            if process.is_terminated() {
                continue;
            }

            let next_level = if used >= quantum {
                (level + 1).min(last_level)
            } else {
                level
            };
            if next_level != level {
                debug!(pid = process.pid(), from = level, to = next_level, "Demoted");
            }
            process.set_queue_level(next_level);
            process.preempt(now);
            self.queues[next_level].push_back(slot);
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
