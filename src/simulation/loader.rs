/*!
 * Process Files
 * Whitespace column format: `PID Priority BurstTime ArrivalTime`
 */

use crate::core::errors::SimulationResult;
use crate::process::Process;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Header line written by [`save_processes`]
pub const PROCESS_FILE_HEADER: &str = "PID Priority BurstTime ArrivalTime";

/// Parse process records from text
///
/// A first line containing `PID` is treated as a header. Blank lines and
/// lines without four leading non-negative integers are skipped, as are
/// records with a zero burst.
pub fn parse_processes(text: &str) -> Vec<Process> {
    let mut processes = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if index == 0 && line.contains("PID") {
            continue;
        }

        match parse_line(line) {
            Some(process) => processes.push(process),
            None => debug!(line = index + 1, content = line, "Skipping malformed process line"),
        }
    }

    processes
}

fn parse_line(line: &str) -> Option<Process> {
    let mut columns = line.split_whitespace();
    let pid = columns.next()?.parse().ok()?;
    let priority = columns.next()?.parse().ok()?;
    let burst = columns.next()?.parse().ok()?;
    let arrival = columns.next()?.parse().ok()?;

    if burst == 0 {
        return None;
    }
    Some(Process::new(pid, priority, burst, arrival))
}

/// Load processes from a file
pub fn load_processes(path: impl AsRef<Path>) -> SimulationResult<Vec<Process>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let processes = parse_processes(&text);
    info!(path = %path.display(), count = processes.len(), "Loaded processes");
    Ok(processes)
}

/// Write the header and one line per process
pub fn write_processes<W: Write>(mut writer: W, processes: &[Process]) -> SimulationResult<()> {
    writeln!(writer, "{}", PROCESS_FILE_HEADER)?;
    for p in processes {
        writeln!(
            writer,
            "{} {} {} {}",
            p.pid(),
            p.base_priority(),
            p.burst_time(),
            p.arrival_time()
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Save processes to a file, replacing it
pub fn save_processes(path: impl AsRef<Path>, processes: &[Process]) -> SimulationResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_processes(std::io::BufWriter::new(file), processes)?;
    info!(path = %path.display(), count = processes.len(), "Saved processes");
    Ok(())
}
