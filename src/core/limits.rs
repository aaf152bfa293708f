/*!
 * Simulation Limits and Defaults
 *
 * Centralized location for default configuration values and the
 * thresholds that shape the dispatch policies.
 */

use super::types::{Priority, Tick};

// =============================================================================
// SCHEDULER DEFAULTS
// =============================================================================

/// Default time quantum for Round Robin and the base level of multilevel queues
pub const DEFAULT_TIME_QUANTUM: Tick = 4;

/// Default cost of one context switch
pub const DEFAULT_CONTEXT_SWITCH_COST: Tick = 1;

/// Default number of queue levels for multilevel policies
pub const DEFAULT_NUM_QUEUES: usize = 3;

/// Default waiting time before a ready process is aged one priority step
pub const DEFAULT_AGING_THRESHOLD: Tick = 10;

/// MLFQ priority boost interval, as a multiple of the aging threshold
/// Used only when no explicit boost interval is configured
pub const BOOST_INTERVAL_MULTIPLIER: Tick = 5;

// =============================================================================
// MULTILEVEL QUEUE BANDS
// =============================================================================

/// Highest priority value routed to the system band (queue 0)
pub const SYSTEM_BAND_MAX_PRIORITY: Priority = 2;

/// Highest priority value routed to the interactive band (queue 1)
pub const INTERACTIVE_BAND_MAX_PRIORITY: Priority = 5;

// =============================================================================
// WORKLOAD GENERATION
// =============================================================================

/// Default upper bound for generated burst times
pub const DEFAULT_MAX_BURST: Tick = 20;

/// Default upper bound for generated arrival times
pub const DEFAULT_MAX_ARRIVAL: Tick = 10;

/// Default upper bound for generated priorities
pub const DEFAULT_MAX_PRIORITY: Priority = 10;
