/*!
 * Priority Scheduler
 * Lowest priority value first, with optional preemption and aging
 */

use super::config::SchedulerConfig;
use super::core::SchedulerCore;
use super::traits::Scheduler;
use super::types::{ExecutionEvent, SchedulerType};
use crate::core::types::{Slot, Tick};
use crate::process::Process;
use tracing::{debug, info, trace};

/// Priority scheduler
///
/// Selects the ready process with the lowest priority value, ties broken by
/// earlier arrival and then lower PID. In preemptive mode the choice is
/// revisited every tick; otherwise a dispatched process runs to completion.
#[derive(Debug, Clone)]
pub struct PriorityScheduler {
    core: SchedulerCore,
    preemptive: bool,
    aging_enabled: bool,
    aging_threshold: Tick,
}

impl PriorityScheduler {
    pub fn new(preemptive: bool, config: SchedulerConfig) -> Self {
        let aging_enabled = config.aging_enabled;
        let aging_threshold = config.aging_threshold;

        Self {
            core: SchedulerCore::new(config),
            preemptive,
            aging_enabled,
            aging_threshold,
        }
    }

    pub fn preemptive(config: SchedulerConfig) -> Self {
        Self::new(true, config)
    }

    pub fn non_preemptive(config: SchedulerConfig) -> Self {
        Self::new(false, config)
    }

    #[inline]
    pub fn is_preemptive(&self) -> bool {
        self.preemptive
    }

    pub fn set_preemptive(&mut self, preemptive: bool) {
        self.preemptive = preemptive;
    }

    #[inline]
    pub fn is_aging_enabled(&self) -> bool {
        self.aging_enabled
    }

    pub fn set_aging_enabled(&mut self, enabled: bool) {
        self.aging_enabled = enabled;
    }

    #[inline]
    pub fn aging_threshold(&self) -> Tick {
        self.aging_threshold
    }

    pub fn set_aging_threshold(&mut self, threshold: Tick) {
        self.aging_threshold = threshold;
    }

    /// Highest-priority ready process that has arrived
    fn select(&self) -> Option<Slot> {
        let now = self.core.now();
        self.core
            .processes()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_ready() && p.arrival_time() <= now)
            .min_by_key(|(_, p)| p.scheduling_key())
            .map(|(slot, _)| slot)
    }

    /// Age every ready process that has waited past the threshold
    fn apply_aging(&mut self) {
        if !self.aging_enabled {
            return;
        }

        let now = self.core.now();
        let threshold = self.aging_threshold;
        for slot in 0..self.core.processes().len() {
            let process = self.core.process_mut(slot);
            if process.age(now, threshold) {
                trace!(pid = process.pid(), priority = process.priority(), now, "Aged process");
            }
        }
    }

    /// Close the current dispatch with a single timeline entry
    fn record_run(&mut self, slot: Slot, start: Tick) {
        let pid = self.core.process(slot).pid();
        let end = self.core.now();
        self.core.record_event(ExecutionEvent::execution(pid, start, end));
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn kind(&self) -> SchedulerType {
        if self.preemptive {
            SchedulerType::PriorityPreemptive
        } else {
            SchedulerType::PriorityNonPreemptive
        }
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
            aging = self.aging_enabled,
            aging_threshold = self.aging_threshold,
            "Starting simulation"
        );

        // Running process and the tick its current dispatch began
        let mut current: Option<(Slot, Tick)> = None;

        while !self.core.is_complete() {
            let now = self.core.now();
            self.core.check_arrivals(now);
            self.apply_aging();

            let (slot, start) = match current {
                Some(running) => running,
                None => match self.select() {
                    Some(slot) => {
                        self.core.begin_dispatch(slot);
                        (slot, self.core.now())
                    }
                    None => {
                        let advanced = self.core.idle_until_next_arrival();
                        assert!(advanced, "No ready process and no pending arrivals");
                        continue;
                    }
                },
            };

            let slice = if self.preemptive {
                1
            } else {
                self.core.process(slot).remaining_time()
            };
            self.core.advance(slot, slice);
            current = Some((slot, start));

            if self.core.process(slot).is_terminated() {
                self.record_run(slot, start);
                current = None;
                continue;
            }

            if self.preemptive {
                let now = self.core.now();
                self.core.check_arrivals(now);

                let running = self.core.process(slot).priority();
                if let Some(best) = self.select() {
                    if self.core.process(best).priority() < running {
                        debug!(
                            preempted = self.core.process(slot).pid(),
                            by = self.core.process(best).pid(),
                            now,
                            "Preemption"
                        );
                        self.record_run(slot, start);
                        self.core.process_mut(slot).preempt(now);
                        current = None;
                    }
                }
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
        self.select().map(|slot| self.core.process(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_aging() -> SchedulerConfig {
        SchedulerConfig::default().with_aging(false, 10)
    }

    fn executions(scheduler: &PriorityScheduler) -> Vec<(u32, Tick, Tick)> {
        scheduler
            .timeline()
            .iter()
            .filter(|e| e.is_execution())
            .filter_map(|e| e.pid.map(|pid| (pid, e.start, e.end)))
            .collect()
    }

    #[test]
    fn test_non_preemptive_picks_lowest_value_first() {
        let mut sched = PriorityScheduler::non_preemptive(no_aging());
        sched.add_process(Process::new(1, 5, 4, 0));
        sched.add_process(Process::new(2, 1, 3, 0));
        sched.add_process(Process::new(3, 3, 2, 0));
        sched.run();

        assert_eq!(sched.timeline()[0].pid, Some(2));
        let order: Vec<u32> = executions(&sched).iter().map(|e| e.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(sched.context_switches(), 2);
    }

    #[test]
    fn test_non_preemptive_runs_to_completion() {
        let mut sched = PriorityScheduler::non_preemptive(no_aging().with_context_switch_cost(0));
        sched.add_process(Process::new(1, 5, 6, 0));
        sched.add_process(Process::new(2, 0, 2, 1));
        sched.run();

        assert_eq!(executions(&sched), vec![(1, 0, 6), (2, 6, 8)]);
    }

    #[test]
    fn test_preemption_on_higher_priority_arrival() {
        let mut sched = PriorityScheduler::preemptive(no_aging().with_context_switch_cost(0));
        sched.add_process(Process::new(1, 5, 6, 0));
        sched.add_process(Process::new(2, 0, 2, 2));
        sched.run();

        assert_eq!(executions(&sched), vec![(1, 0, 2), (2, 2, 4), (1, 4, 8)]);
        assert_eq!(sched.context_switches(), 2);
        assert_eq!(sched.processes()[1].response_time(), Some(0));
        assert_eq!(sched.processes()[0].waiting_time(), 2);
    }

    #[test]
    fn test_equal_priority_does_not_preempt() {
        let mut sched = PriorityScheduler::preemptive(no_aging().with_context_switch_cost(0));
        sched.add_process(Process::new(1, 3, 4, 0));
        sched.add_process(Process::new(2, 3, 2, 1));
        sched.run();

        assert_eq!(executions(&sched), vec![(1, 0, 4), (2, 4, 6)]);
    }

    #[test]
    fn test_tie_breaks_by_arrival_then_pid() {
        let mut sched = PriorityScheduler::non_preemptive(no_aging().with_context_switch_cost(0));
        sched.add_process(Process::new(9, 1, 2, 0));
        sched.add_process(Process::new(4, 1, 2, 0));
        sched.add_process(Process::new(1, 0, 1, 0));
        sched.run();

        let order: Vec<u32> = executions(&sched).iter().map(|e| e.0).collect();
        assert_eq!(order, vec![1, 4, 9]);
    }

    #[test]
    fn test_aging_lets_starved_process_through() {
        let config = SchedulerConfig::default()
            .with_context_switch_cost(0)
            .with_aging(true, 2);
        let mut sched = PriorityScheduler::preemptive(config);
        sched.add_process(Process::new(1, 1, 10, 0));
        sched.add_process(Process::new(2, 3, 1, 0));
        sched.run();

        // P2 ages 3 -> 2 -> 1 -> 0 at ticks 2, 4 and 6 and beats P1 at the
        // check closing tick 6
        assert_eq!(executions(&sched), vec![(1, 0, 7), (2, 7, 8), (1, 8, 11)]);
        assert_eq!(sched.context_switches(), 2);

        let p1 = &sched.processes()[0];
        let p2 = &sched.processes()[1];
        assert_eq!(p2.priority(), 0);
        assert_eq!(p2.completion_time(), Some(8));
        assert_eq!(p2.waiting_time(), 7);
        // Running processes do not age
        assert_eq!(p1.priority(), p1.base_priority());
    }

    #[test]
    fn test_slow_aging_finishes_runner_first() {
        let config = SchedulerConfig::default()
            .with_context_switch_cost(0)
            .with_aging(true, 3);
        let mut sched = PriorityScheduler::preemptive(config);
        sched.add_process(Process::new(1, 1, 10, 0));
        sched.add_process(Process::new(2, 3, 1, 0));
        sched.run();

        // P2 only reaches 0 at tick 9, the last tick of P1's burst
        assert_eq!(executions(&sched), vec![(1, 0, 10), (2, 10, 11)]);
        assert_eq!(sched.context_switches(), 1);
        assert_eq!(sched.processes()[1].priority(), 0);
        assert_eq!(sched.processes()[1].waiting_time(), 10);
    }

    #[test]
    fn test_rerun_restores_aged_priorities() {
        let config = SchedulerConfig::default().with_aging(true, 1);
        let mut sched = PriorityScheduler::non_preemptive(config);
        sched.add_process(Process::new(1, 0, 8, 0));
        sched.add_process(Process::new(2, 6, 2, 0));
        sched.run();
        let first = sched.metrics().clone();
        sched.run();
        assert_eq!(sched.metrics(), &first);
    }
}
