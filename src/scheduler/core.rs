/*!
 * Scheduler Core
 * State and bookkeeping shared by every dispatch policy
 */

use super::config::SchedulerConfig;
use super::types::ExecutionEvent;
use crate::core::types::{Pid, QueueLevel, Slot, Tick};
use crate::metrics::Metrics;
use crate::process::{Process, ProcessState};
use tracing::{debug, trace};

/// Registry, clock and timeline owned by one algorithm instance
///
/// Processes are addressed by [`Slot`], their index in the registry. The
/// registry only grows through [`SchedulerCore::add_process`] and never
/// during a run, so slots held in ready queues stay valid.
#[derive(Debug, Clone, Default)]
pub struct SchedulerCore {
    processes: Vec<Process>,
    timeline: Vec<ExecutionEvent>,
    config: SchedulerConfig,
    metrics: Metrics,
    now: Tick,
    context_switches: u64,
    // PID of the process that last held the CPU
    last_pid: Option<Pid>,
}

impl SchedulerCore {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append a process, leaving its state as the caller set it
    pub fn add_process(&mut self, process: Process) -> Slot {
        assert!(
            process.burst_time() > 0,
            "Process {} has an empty burst",
            process.pid()
        );
        self.processes.push(process);
        self.processes.len() - 1
    }

    /// Clear timeline, metrics, clock and counters and reset every process
    pub fn reset(&mut self) {
        self.timeline.clear();
        self.metrics = Metrics::default();
        self.now = 0;
        self.context_switches = 0;
        self.last_pid = None;
        for process in &mut self.processes {
            process.reset();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    #[inline]
    pub fn process(&self, slot: Slot) -> &Process {
        &self.processes[slot]
    }

    #[inline]
    pub(crate) fn process_mut(&mut self, slot: Slot) -> &mut Process {
        &mut self.processes[slot]
    }

    pub fn slot_of(&self, pid: Pid) -> Option<Slot> {
        self.processes.iter().position(|p| p.pid() == pid)
    }

    #[inline]
    pub fn timeline(&self) -> &[ExecutionEvent] {
        &self.timeline
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    #[inline]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    #[inline]
    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// True once every owned process has terminated
    pub fn is_complete(&self) -> bool {
        self.processes.iter().all(Process::is_terminated)
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Promote every `New` process that has arrived by `time` to `Ready`
    ///
    /// Returns the promoted slots ordered by arrival time, ties broken by
    /// registry (input) order.
    pub fn check_arrivals(&mut self, time: Tick) -> Vec<Slot> {
        let mut arrived: Vec<Slot> = self
            .processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.state() == ProcessState::New && p.arrival_time() <= time)
            .map(|(slot, _)| slot)
            .collect();
        arrived.sort_by_key(|&slot| (self.processes[slot].arrival_time(), slot));

        for &slot in &arrived {
            let process = &mut self.processes[slot];
            process.mark_ready();
            process.start_waiting(process.arrival_time());
            trace!(pid = process.pid(), time, "Process arrived");
        }

        arrived
    }

    /// Earliest arrival among processes that have not arrived yet
    pub fn next_arrival(&self) -> Option<Tick> {
        self.processes
            .iter()
            .filter(|p| p.state() == ProcessState::New)
            .map(Process::arrival_time)
            .min()
    }

    /// Charge a context switch when the CPU changes hands
    ///
    /// No-op when there is no previous process or the PIDs match. Otherwise
    /// counts the switch, records it and advances the clock by its cost.
    pub fn perform_context_switch(&mut self, from: Option<Pid>, to: Pid) {
        let Some(from) = from else {
            return;
        };
        if from == to {
            return;
        }

        let end = self.now.saturating_add(self.config.context_switch_cost);
        self.context_switches += 1;
        self.record_event(ExecutionEvent::context_switch(self.now, end));
        self.now = end;
        trace!(from, to, now = self.now, "Context switch");
    }

    pub fn record_event(&mut self, event: ExecutionEvent) {
        debug_assert!(event.start <= event.end, "Event ends before it starts");
        self.timeline.push(event);
    }

    /// Record an idle gap and jump the clock to `until`
    pub fn record_idle(&mut self, until: Tick) {
        if until <= self.now {
            return;
        }
        debug!(from = self.now, until, "CPU idle");
        self.record_event(ExecutionEvent::idle(self.now, until));
        self.now = until;
    }

    /// Jump to the next arrival when nothing is ready
    ///
    /// Returns false when no process is left to arrive.
    pub fn idle_until_next_arrival(&mut self) -> bool {
        match self.next_arrival() {
            Some(arrival) => {
                self.record_idle(arrival.max(self.now));
                true
            }
            None => false,
        }
    }

    /// Switch to `slot` and stamp it as running
    ///
    /// Charges a context switch against the last process to hold the CPU,
    /// then marks the process `Running` at the post-switch clock.
    pub fn begin_dispatch(&mut self, slot: Slot) {
        let pid = self.processes[slot].pid();
        self.perform_context_switch(self.last_pid, pid);
        self.last_pid = Some(pid);
        let now = self.now;
        self.processes[slot].mark_running(now);
    }

    /// Run the dispatched process for up to `slice` ticks
    ///
    /// Advances the clock by the ticks consumed and finalizes the process if
    /// it finished. Does not record a timeline entry.
    pub fn advance(&mut self, slot: Slot, slice: Tick) -> Tick {
        let used = self.processes[slot].execute(slice);
        assert!(used > 0, "Dispatched P{} consumed no time", self.processes[slot].pid());
        self.now = self.now.saturating_add(used);

        if self.processes[slot].is_completed() {
            let now = self.now;
            let process = &mut self.processes[slot];
            process.finalize(now);
            debug!(
                pid = process.pid(),
                completion = now,
                turnaround = process.turnaround_time(),
                waiting = process.waiting_time(),
                "Process terminated"
            );
        }
        used
    }

    /// Dispatch `slot` for one slice and record it
    ///
    /// Returns the ticks consumed.
    pub fn dispatch(&mut self, slot: Slot, slice: Tick, level: Option<QueueLevel>) -> Tick {
        self.begin_dispatch(slot);
        let start = self.now;
        let used = self.advance(slot, slice);

        let mut event = ExecutionEvent::execution(self.processes[slot].pid(), start, self.now);
        if let Some(level) = level {
            event = event.at_level(level);
        }
        self.record_event(event);
        used
    }

    /// Derive metrics from the finished run
    pub fn calculate_metrics(&mut self) {
        debug_assert!(self.is_complete(), "Metrics requested mid-simulation");
        self.metrics = Metrics::calculate(
            &self.processes,
            &self.timeline,
            self.now,
            self.context_switches,
            self.config.context_switch_cost,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_with(processes: &[(u32, u32, Tick, Tick)]) -> SchedulerCore {
        let mut core = SchedulerCore::new(SchedulerConfig::default());
        for &(pid, priority, burst, arrival) in processes {
            core.add_process(Process::new(pid, priority, burst, arrival));
        }
        core
    }

    #[test]
    fn test_check_arrivals_orders_by_arrival_then_input() {
        let mut core = core_with(&[(1, 0, 3, 4), (2, 0, 3, 2), (3, 0, 3, 2), (4, 0, 3, 9)]);

        assert_eq!(core.check_arrivals(1), Vec::<Slot>::new());
        assert_eq!(core.check_arrivals(4), vec![1, 2, 0]);
        assert_eq!(core.process(0).state(), ProcessState::Ready);
        assert_eq!(core.process(3).state(), ProcessState::New);
        // Already promoted processes are not reported twice
        assert_eq!(core.check_arrivals(4), Vec::<Slot>::new());
        assert_eq!(core.next_arrival(), Some(9));
        assert_eq!(core.slot_of(3), Some(2));
        assert_eq!(core.slot_of(42), None);
    }

    #[test]
    fn test_context_switch_bookkeeping() {
        let mut core = core_with(&[]);

        core.perform_context_switch(None, 1);
        core.perform_context_switch(Some(1), 1);
        assert_eq!(core.context_switches(), 0);
        assert!(core.timeline().is_empty());

        core.perform_context_switch(Some(1), 2);
        assert_eq!(core.context_switches(), 1);
        assert_eq!(core.now(), 1);
        assert_eq!(core.timeline()[0], ExecutionEvent::context_switch(0, 1));
    }

    #[test]
    fn test_clock_saturates_on_huge_switch_cost() {
        let config = SchedulerConfig::default().with_context_switch_cost(Tick::MAX);
        let mut core = SchedulerCore::new(config);
        core.perform_context_switch(Some(1), 2);
        core.perform_context_switch(Some(2), 1);

        assert_eq!(core.context_switches(), 2);
        assert_eq!(core.now(), Tick::MAX);
        assert_eq!(core.timeline()[1], ExecutionEvent::context_switch(Tick::MAX, Tick::MAX));
    }

    #[test]
    fn test_dispatch_records_and_finalizes() {
        let mut core = core_with(&[(1, 0, 3, 0)]);
        core.check_arrivals(0);

        assert_eq!(core.dispatch(0, 2, None), 2);
        assert_eq!(core.process(0).state(), ProcessState::Running);
        let now = core.now();
        core.process_mut(0).preempt(now);

        assert_eq!(core.dispatch(0, 2, Some(1)), 1);
        assert!(core.is_complete());
        assert_eq!(core.process(0).completion_time(), Some(3));
        assert_eq!(core.timeline().len(), 2);
        assert_eq!(core.timeline()[1].queue_level, Some(1));
    }

    #[test]
    fn test_reset_clears_run_state() {
        let mut core = core_with(&[(1, 0, 2, 0)]);
        core.check_arrivals(0);
        core.dispatch(0, 2, None);
        core.calculate_metrics();
        assert_eq!(core.metrics().process_count, 1);

        core.reset();
        assert_eq!(core.now(), 0);
        assert!(core.timeline().is_empty());
        assert_eq!(core.metrics().process_count, 0);
        assert_eq!(core.process(0).state(), ProcessState::New);
        assert_eq!(core.processes().len(), 1);
    }
}
