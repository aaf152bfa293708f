/*!
 * CPU Scheduler Simulator Library
 * Discrete-time simulation of classical CPU scheduling policies
 */

pub mod core;
pub mod metrics;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use crate::core::errors::{SimulationError, SimulationResult};
pub use crate::core::types::{Pid, Priority, QueueLevel, Slot, Tick};
pub use metrics::Metrics;
pub use monitoring::init_tracing;
pub use process::{Process, ProcessState};
pub use scheduler::{
    ExecutionEvent, MultilevelFeedbackQueueScheduler, MultilevelQueueScheduler, PriorityScheduler,
    QueueClass, QueueConfig, RoundRobinScheduler, Scheduler, SchedulerConfig, SchedulerCore,
    SchedulerType,
};
pub use simulation::{
    best_by, export_comparison, generate_processes, load_processes, save_processes, Criterion,
    GeneratorSpec, SimulationReport, Simulator,
};
