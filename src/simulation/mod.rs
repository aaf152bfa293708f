/*!
 * Simulation Orchestrator
 * Runs algorithms over a shared workload and collects comparable reports
 */

pub mod export;
pub mod generator;
pub mod loader;

pub use export::{
    export_comparison, export_metrics, write_comparison_csv, write_metrics_csv, COMPARISON_HEADER,
};
pub use generator::{generate_processes, GeneratorSpec};
pub use loader::{load_processes, parse_processes, save_processes, write_processes};

use crate::core::errors::{SimulationError, SimulationResult};
use crate::metrics::Metrics;
use crate::monitoring::RunSpan;
use crate::process::Process;
use crate::scheduler::{ExecutionEvent, SchedulerConfig, SchedulerType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::panic;
use std::str::FromStr;
use std::thread;
use tracing::info;

/// Outcome of one algorithm run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub algorithm: String,
    pub kind: SchedulerType,
    pub metrics: Metrics,
    pub timeline: Vec<ExecutionEvent>,
    pub processes: Vec<Process>,
}

impl SimulationReport {
    pub fn to_json(&self) -> SimulationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Metric used to rank reports; lower is better except where noted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    WaitingTime,
    TurnaroundTime,
    ResponseTime,
    /// Higher is better
    Utilization,
    /// Higher is better
    Throughput,
    ContextSwitches,
}

impl Criterion {
    /// Score where lower is better
    fn score(&self, metrics: &Metrics) -> f64 {
        match self {
            Self::WaitingTime => metrics.avg_waiting_time,
            Self::TurnaroundTime => metrics.avg_turnaround_time,
            Self::ResponseTime => metrics.avg_response_time,
            Self::Utilization => -metrics.cpu_utilization,
            Self::Throughput => -metrics.throughput,
            Self::ContextSwitches => metrics.context_switches as f64,
        }
    }
}

impl FromStr for Criterion {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" | "waiting_time" => Ok(Self::WaitingTime),
            "turnaround" | "turnaround_time" => Ok(Self::TurnaroundTime),
            "response" | "response_time" => Ok(Self::ResponseTime),
            "utilization" | "cpu_utilization" => Ok(Self::Utilization),
            "throughput" => Ok(Self::Throughput),
            "context_switches" | "switches" => Ok(Self::ContextSwitches),
            _ => Err(SimulationError::Configuration(format!(
                "unknown comparison criterion '{}'",
                s
            ))),
        }
    }
}

/// Runs scheduling algorithms over one base workload
///
/// Every run builds a fresh scheduler and feeds it copies of the base list,
/// so runs are independent and may execute in parallel.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SchedulerConfig,
    processes: Vec<Process>,
    algorithms: Vec<SchedulerType>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Simulator {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            processes: Vec::new(),
            algorithms: SchedulerType::ALL.to_vec(),
        }
    }

    pub fn with_algorithms(mut self, algorithms: Vec<SchedulerType>) -> Self {
        self.algorithms = algorithms;
        self
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config;
    }

    #[inline]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    #[inline]
    pub fn algorithms(&self) -> &[SchedulerType] {
        &self.algorithms
    }

    /// Replace the base workload
    ///
    /// Rejects duplicate PIDs and zero bursts. Each process is reset so the
    /// base list never carries run state.
    pub fn set_processes(&mut self, processes: Vec<Process>) -> SimulationResult<()> {
        let mut seen = HashSet::with_capacity(processes.len());
        for p in &processes {
            if p.burst_time() == 0 {
                return Err(SimulationError::InvalidProcess(format!(
                    "process {} has a zero burst time",
                    p.pid()
                )));
            }
            if !seen.insert(p.pid()) {
                return Err(SimulationError::InvalidProcess(format!(
                    "duplicate PID {}",
                    p.pid()
                )));
            }
        }

        self.processes = processes;
        for p in &mut self.processes {
            p.reset();
        }
        Ok(())
    }

    /// Append one process to the base workload
    pub fn add_process(&mut self, process: Process) -> SimulationResult<()> {
        let mut all = self.processes.clone();
        all.push(process);
        self.set_processes(all)
    }

    pub fn clear_processes(&mut self) {
        self.processes.clear();
    }

    /// Load the base workload from a process file
    pub fn load_processes(&mut self, path: impl AsRef<std::path::Path>) -> SimulationResult<usize> {
        let processes = load_processes(path)?;
        if processes.is_empty() {
            return Err(SimulationError::NoProcesses);
        }
        self.set_processes(processes)?;
        Ok(self.processes.len())
    }

    pub fn save_processes(&self, path: impl AsRef<std::path::Path>) -> SimulationResult<()> {
        save_processes(path, &self.processes)
    }

    /// Replace the base workload with a random one
    pub fn generate_processes(&mut self, count: usize, spec: &GeneratorSpec) -> SimulationResult<()> {
        self.set_processes(generate_processes(count, spec))
    }

    /// Run one algorithm over the base workload
    pub fn run(&self, kind: SchedulerType) -> SimulationResult<SimulationReport> {
        if self.processes.is_empty() {
            return Err(SimulationError::NoProcesses);
        }
        Ok(run_one(kind, &self.config, &self.processes))
    }

    /// Run every registered algorithm in order
    pub fn run_all(&self) -> SimulationResult<Vec<SimulationReport>> {
        if self.processes.is_empty() {
            return Err(SimulationError::NoProcesses);
        }
        info!(
            algorithms = self.algorithms.len(),
            processes = self.processes.len(),
            "Running comparison"
        );
        Ok(self
            .algorithms
            .iter()
            .map(|&kind| run_one(kind, &self.config, &self.processes))
            .collect())
    }

    /// Run every registered algorithm on its own thread
    ///
    /// Reports come back in registration order, identical to [`Simulator::run_all`].
    pub fn run_all_parallel(&self) -> SimulationResult<Vec<SimulationReport>> {
        if self.processes.is_empty() {
            return Err(SimulationError::NoProcesses);
        }
        info!(
            algorithms = self.algorithms.len(),
            processes = self.processes.len(),
            "Running comparison in parallel"
        );

        let config = &self.config;
        let processes = self.processes.as_slice();
        Ok(thread::scope(|scope| {
            let handles: Vec<_> = self
                .algorithms
                .iter()
                .map(|&kind| scope.spawn(move || run_one(kind, config, processes)))
                .collect();
            join_all(handles)
        }))
    }
}

/// Join in spawn order, re-raising a worker panic on the caller
fn join_all<T>(handles: Vec<thread::ScopedJoinHandle<'_, T>>) -> Vec<T> {
    handles
        .into_iter()
        .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
        .collect()
}

/// Best report under `criterion`; ties keep the earliest
pub fn best_by(reports: &[SimulationReport], criterion: Criterion) -> Option<&SimulationReport> {
    reports.iter().reduce(|best, candidate| {
        if criterion.score(&candidate.metrics) < criterion.score(&best.metrics) {
            candidate
        } else {
            best
        }
    })
}

fn run_one(kind: SchedulerType, config: &SchedulerConfig, processes: &[Process]) -> SimulationReport {
    let mut scheduler = kind.build(config);
    let span = RunSpan::new(scheduler.name(), processes.len());
    let _entered = span.enter();

    scheduler.add_processes(processes);
    scheduler.run();
    span.record_total_time(scheduler.current_time());

    let metrics = scheduler.metrics().clone();
    info!(
        algorithm = scheduler.name(),
        avg_waiting = metrics.avg_waiting_time,
        avg_turnaround = metrics.avg_turnaround_time,
        avg_response = metrics.avg_response_time,
        utilization = metrics.cpu_utilization,
        context_switches = metrics.context_switches,
        "Algorithm finished"
    );

    SimulationReport {
        algorithm: scheduler.name().to_string(),
        kind,
        metrics,
        timeline: scheduler.timeline().to_vec(),
        processes: scheduler.processes().to_vec(),
    }
}
