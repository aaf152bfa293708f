/*!
 * Round Robin Scheduler
 * FIFO ring with a fixed time quantum
 */

use super::config::SchedulerConfig;
use super::core::SchedulerCore;
use super::traits::Scheduler;
use super::types::SchedulerType;
use crate::core::types::{Slot, Tick};
use crate::process::Process;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Round Robin scheduler
///
/// Ready processes wait in a strict FIFO ring. A process that exhausts its
/// quantum re-enters at the back, behind anything that arrived while it ran.
#[derive(Debug, Clone)]
pub struct RoundRobinScheduler {
    core: SchedulerCore,
    quantum: Tick,
    ring: VecDeque<Slot>,
}

impl RoundRobinScheduler {
    /// Create a scheduler using the configured quantum
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_quantum(0, config)
    }

    /// Create a scheduler with an explicit quantum
    ///
    /// A zero quantum falls back to the configured one.
    pub fn with_quantum(quantum: Tick, config: SchedulerConfig) -> Self {
        let quantum = if quantum > 0 {
            quantum
        } else {
            config.effective_quantum()
        };

        Self {
            core: SchedulerCore::new(config),
            quantum,
            ring: VecDeque::new(),
        }
    }

    #[inline]
    pub fn quantum(&self) -> Tick {
        self.quantum
    }

    fn admit_arrivals(&mut self) {
        let now = self.core.now();
        let arrived = self.core.check_arrivals(now);
        self.ring.extend(arrived);
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        SchedulerType::RoundRobin.display_name()
    }

    fn kind(&self) -> SchedulerType {
        SchedulerType::RoundRobin
    }

    fn core(&self) -> &SchedulerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SchedulerCore {
        &mut self.core
    }

    fn run(&mut self) {
        self.reset();
        info!(
            algorithm = self.name(),
            processes = self.core.processes().len(),
            quantum = self.quantum,
            "Starting simulation"
        );

        self.admit_arrivals();

        while !self.core.is_complete() {
            let Some(slot) = self.ring.pop_front() else {
                let advanced = self.core.idle_until_next_arrival();
                assert!(advanced, "Ready ring empty with no pending arrivals");
                self.admit_arrivals();
                continue;
            };

            let used = self.core.dispatch(slot, self.quantum, None);

            // Arrivals during the slice queue ahead of the preempted process
            self.admit_arrivals();

            let now = self.core.now();
            let process = self.core.process_mut(slot);
            if !process.is_terminated() {
                debug!(pid = process.pid(), used, remaining = process.remaining_time(), "Quantum expired");
                process.preempt(now);
                self.ring.push_back(slot);
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
        self.ring.front().map(|&slot| self.core.process(slot))
    }

    fn reset(&mut self) {
        self.core.reset();
        self.ring.clear();
    }
}
