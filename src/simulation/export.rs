/*!
 * CSV Export
 * Comparison table and per-run metric sheets
 */

use super::SimulationReport;
use crate::core::errors::SimulationResult;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub const COMPARISON_HEADER: &str =
    "Algorithm,AvgWaitTime,AvgTurnaroundTime,AvgResponseTime,CPUUtilization,Throughput,ContextSwitches";

/// One row per report under [`COMPARISON_HEADER`]
pub fn write_comparison_csv<W: Write>(
    mut writer: W,
    reports: &[SimulationReport],
) -> SimulationResult<()> {
    writeln!(writer, "{}", COMPARISON_HEADER)?;
    for report in reports {
        let m = &report.metrics;
        writeln!(
            writer,
            "{},{:.2},{:.2},{:.2},{:.2},{:.4},{}",
            report.algorithm,
            m.avg_waiting_time,
            m.avg_turnaround_time,
            m.avg_response_time,
            m.cpu_utilization,
            m.throughput,
            m.context_switches
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_comparison(path: impl AsRef<Path>, reports: &[SimulationReport]) -> SimulationResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_comparison_csv(BufWriter::new(file), reports)?;
    info!(path = %path.display(), rows = reports.len(), "Exported comparison");
    Ok(())
}

/// Metric/value sheet for a single run followed by per-process timings
pub fn write_metrics_csv<W: Write>(mut writer: W, report: &SimulationReport) -> SimulationResult<()> {
    let m = &report.metrics;
    writeln!(writer, "Metric,Value")?;
    writeln!(writer, "Algorithm,{}", report.algorithm)?;
    writeln!(writer, "Process Count,{}", m.process_count)?;
    writeln!(writer, "Total Execution Time,{}", m.total_time)?;
    writeln!(writer, "Idle Time,{}", m.idle_time)?;
    writeln!(writer, "Average Waiting Time,{:.2}", m.avg_waiting_time)?;
    writeln!(writer, "Average Turnaround Time,{:.2}", m.avg_turnaround_time)?;
    writeln!(writer, "Average Response Time,{:.2}", m.avg_response_time)?;
    writeln!(writer, "CPU Utilization (%),{:.2}", m.cpu_utilization)?;
    writeln!(writer, "Throughput (proc/time),{:.4}", m.throughput)?;
    writeln!(writer, "Context Switches,{}", m.context_switches)?;
    writeln!(writer, "Context Switch Overhead,{}", m.context_switch_overhead)?;

    if !report.processes.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Process,Waiting Time,Turnaround Time,Response Time")?;
        for p in &report.processes {
            writeln!(
                writer,
                "{},{},{},{}",
                p.name(),
                p.waiting_time(),
                p.turnaround_time(),
                p.response_time().unwrap_or(0)
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn export_metrics(path: impl AsRef<Path>, report: &SimulationReport) -> SimulationResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_metrics_csv(BufWriter::new(file), report)?;
    info!(path = %path.display(), algorithm = %report.algorithm, "Exported metrics");
    Ok(())
}
