/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Virtual clock tick (the only unit of time in a simulation)
pub type Tick = u64;

/// Priority level (lower value = more important, 0 is the most urgent)
pub type Priority = u32;

/// Index of a process inside a scheduler's registry
///
/// Slots are stable for the duration of a run: the registry is never
/// reordered or compacted while a simulation is in progress.
pub type Slot = usize;

/// Queue level for multilevel policies (0 = highest)
pub type QueueLevel = usize;
