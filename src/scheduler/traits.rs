/*!
 * Scheduler Traits
 * Interface every dispatch policy implements
 */

use super::config::SchedulerConfig;
use super::core::SchedulerCore;
use super::types::{ExecutionEvent, SchedulerType};
use crate::core::types::Tick;
use crate::metrics::Metrics;
use crate::process::Process;

/// A CPU scheduling algorithm
///
/// Each implementation owns a [`SchedulerCore`] holding private copies of
/// its processes, so independent instances can run on separate threads.
/// Typical use: construct, `add_process` for each input, `run`, then read
/// `metrics` and `timeline`.
pub trait Scheduler: Send {
    /// Human-readable algorithm name
    fn name(&self) -> &'static str;

    fn kind(&self) -> SchedulerType;

    fn core(&self) -> &SchedulerCore;

    fn core_mut(&mut self) -> &mut SchedulerCore;

    /// Simulate every owned process to termination
    ///
    /// Resets before simulating, so calling it again on the same instance
    /// reproduces the same run. Computes metrics at the end.
    fn run(&mut self);

    /// Peek at the process that would be dispatched next, if any is ready
    fn next_process(&self) -> Option<&Process>;

    /// Clear run state and restore every process to `New`
    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn add_process(&mut self, process: Process) {
        self.core_mut().add_process(process);
    }

    fn add_processes(&mut self, processes: &[Process]) {
        for process in processes {
            self.add_process(process.clone());
        }
    }

    fn metrics(&self) -> &Metrics {
        self.core().metrics()
    }

    fn timeline(&self) -> &[ExecutionEvent] {
        self.core().timeline()
    }

    fn processes(&self) -> &[Process] {
        self.core().processes()
    }

    fn current_time(&self) -> Tick {
        self.core().now()
    }

    fn context_switches(&self) -> u64 {
        self.core().context_switches()
    }

    fn config(&self) -> &SchedulerConfig {
        self.core().config()
    }

    fn is_complete(&self) -> bool {
        self.core().is_complete()
    }
}
