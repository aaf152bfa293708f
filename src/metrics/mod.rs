/*!
 * Performance Metrics
 * Summary statistics derived from a finished simulation run
 */

mod stats;

pub use stats::{mean, sample_variance};

use crate::core::types::Tick;
use crate::process::Process;
use crate::scheduler::ExecutionEvent;
use serde::{Deserialize, Serialize};

/// Aggregated metrics for one algorithm run
///
/// Computed once from the finalized processes and timeline; never updated
/// while a simulation is in progress. Every field is zero for an empty run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub process_count: usize,
    pub total_time: Tick,
    pub idle_time: Tick,
    pub context_switches: u64,
    pub context_switch_overhead: Tick,

    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub avg_response_time: f64,
    /// Percentage of the run spent on useful work
    pub cpu_utilization: f64,
    /// Processes completed per tick
    pub throughput: f64,

    pub waiting_time_variance: f64,
    pub turnaround_time_variance: f64,
    pub min_waiting_time: Tick,
    pub max_waiting_time: Tick,

    pub waiting_times: Vec<Tick>,
    pub turnaround_times: Vec<Tick>,
    pub response_times: Vec<Tick>,
}

impl Metrics {
    /// Aggregate a finished run
    ///
    /// `total_time` is the final clock value. Idle time is the part of
    /// `[0, total_time)` not covered by any execution or context-switch
    /// entry of the timeline.
    pub fn calculate(
        processes: &[Process],
        timeline: &[ExecutionEvent],
        total_time: Tick,
        context_switches: u64,
        context_switch_cost: Tick,
    ) -> Self {
        let waiting_times: Vec<Tick> = processes.iter().map(Process::waiting_time).collect();
        let turnaround_times: Vec<Tick> =
            processes.iter().map(Process::turnaround_time).collect();
        let response_times: Vec<Tick> = processes
            .iter()
            .map(|p| {
                debug_assert!(p.response_time().is_some(), "P{} never dispatched", p.pid());
                p.response_time().unwrap_or(0)
            })
            .collect();

        let process_count = processes.len();
        let avg_waiting_time = mean(&waiting_times);
        let avg_turnaround_time = mean(&turnaround_times);
        let avg_response_time = mean(&response_times);

        let idle_time = idle_time(timeline, total_time);
        let context_switch_overhead = context_switches.saturating_mul(context_switch_cost);

        let (cpu_utilization, throughput) = if total_time > 0 {
            let useful = total_time
                .saturating_sub(idle_time)
                .saturating_sub(context_switch_overhead);
            (
                useful as f64 * 100.0 / total_time as f64,
                process_count as f64 / total_time as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            process_count,
            total_time,
            idle_time,
            context_switches,
            context_switch_overhead,
            avg_waiting_time,
            avg_turnaround_time,
            avg_response_time,
            cpu_utilization,
            throughput,
            waiting_time_variance: sample_variance(&waiting_times, avg_waiting_time),
            turnaround_time_variance: sample_variance(&turnaround_times, avg_turnaround_time),
            min_waiting_time: waiting_times.iter().copied().min().unwrap_or(0),
            max_waiting_time: waiting_times.iter().copied().max().unwrap_or(0),
            waiting_times,
            turnaround_times,
            response_times,
        }
    }
}

/// Gaps in `[0, total_time)` not covered by execution or context switches
fn idle_time(timeline: &[ExecutionEvent], total_time: Tick) -> Tick {
    let mut idle = 0;
    let mut covered_until = 0;

    for event in timeline.iter().filter(|e| !e.is_idle()) {
        if event.start > covered_until {
            idle += event.start - covered_until;
        }
        covered_until = covered_until.max(event.end);
    }

    idle + total_time.saturating_sub(covered_until)
}
