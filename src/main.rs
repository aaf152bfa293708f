/*!
 * CPU Scheduler Simulator - Main Entry Point
 *
 * Runs every scheduling algorithm over one workload and reports:
 * - Average waiting, turnaround and response time
 * - CPU utilization and throughput
 * - Context switch counts
 *
 * Usage: cpu-sched [PROCESS_FILE]
 */

use std::error::Error;
use tracing::{debug, info};

use cpu_scheduler_sim::{
    best_by, export_comparison, generate_processes, init_tracing, load_processes, Criterion,
    GeneratorSpec, SchedulerConfig, Simulator,
};

const ENV_CONFIG: &str = "SCHED_CONFIG";
const ENV_PROCESS_COUNT: &str = "SCHED_PROCESS_COUNT";
const ENV_SEED: &str = "SCHED_SEED";
const ENV_OUTPUT: &str = "SCHED_OUTPUT";

const DEFAULT_PROCESS_COUNT: usize = 8;

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    info!("CPU scheduler simulator starting...");

    let config = match std::env::var(ENV_CONFIG) {
        Ok(path) => SchedulerConfig::load(&path)?,
        Err(_) => SchedulerConfig::default(),
    }
    .apply_env()?;
    info!(?config, "Configuration ready");

    let processes = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "Loading processes");
            load_processes(&path)?
        }
        None => {
            let count = match std::env::var(ENV_PROCESS_COUNT) {
                Ok(raw) => raw.trim().parse()?,
                Err(_) => DEFAULT_PROCESS_COUNT,
            };
            let mut spec = GeneratorSpec::default();
            if let Ok(raw) = std::env::var(ENV_SEED) {
                spec = spec.with_seed(raw.trim().parse()?);
            }
            info!(count, seed = ?spec.seed, "Generating random workload");
            generate_processes(count, &spec)
        }
    };

    let mut simulator = Simulator::new(config);
    simulator.set_processes(processes)?;

    let reports = simulator.run_all_parallel()?;

    info!("================================================");
    for report in &reports {
        let m = &report.metrics;
        info!(
            algorithm = %report.algorithm,
            avg_waiting = format_args!("{:.2}", m.avg_waiting_time),
            avg_turnaround = format_args!("{:.2}", m.avg_turnaround_time),
            avg_response = format_args!("{:.2}", m.avg_response_time),
            utilization = format_args!("{:.2}%", m.cpu_utilization),
            throughput = format_args!("{:.4}", m.throughput),
            context_switches = m.context_switches,
            "Result"
        );
    }

    for (label, criterion) in [
        ("waiting time", Criterion::WaitingTime),
        ("turnaround time", Criterion::TurnaroundTime),
        ("response time", Criterion::ResponseTime),
    ] {
        if let Some(best) = best_by(&reports, criterion) {
            info!(algorithm = %best.algorithm, "Best {}", label);
        }
    }

    match std::env::var(ENV_OUTPUT) {
        Ok(path) => export_comparison(&path, &reports)?,
        Err(_) => debug!("{} not set, skipping CSV export", ENV_OUTPUT),
    }

    info!("Simulation complete");
    Ok(())
}
