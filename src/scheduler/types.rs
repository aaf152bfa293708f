/*!
 * Scheduler Types
 * Algorithm identity and timeline records
 */

use crate::core::errors::SimulationError;
use crate::core::types::{Pid, QueueLevel, Tick};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling algorithm selector
///
/// Closed set of the dispatch policies the simulator implements. The
/// orchestrator picks an algorithm by value and builds it through
/// [`SchedulerType::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerType {
    /// FIFO ring with a fixed time quantum
    RoundRobin,
    /// Lowest priority value first, re-evaluated every tick
    PriorityPreemptive,
    /// Lowest priority value first, runs to completion
    PriorityNonPreemptive,
    /// Fixed priority bands, round robin inside each band
    MultilevelQueue,
    /// Adaptive levels with demotion and periodic boost
    MultilevelFeedbackQueue,
}

impl SchedulerType {
    /// Every algorithm, in comparison order
    pub const ALL: [SchedulerType; 5] = [
        Self::RoundRobin,
        Self::PriorityPreemptive,
        Self::PriorityNonPreemptive,
        Self::MultilevelQueue,
        Self::MultilevelFeedbackQueue,
    ];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::PriorityPreemptive => "priority",
            Self::PriorityNonPreemptive => "priority_np",
            Self::MultilevelQueue => "mlq",
            Self::MultilevelFeedbackQueue => "mlfq",
        }
    }

    /// Human-readable algorithm name
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::RoundRobin => "Round Robin",
            Self::PriorityPreemptive => "Priority (Preemptive)",
            Self::PriorityNonPreemptive => "Priority (Non-Preemptive)",
            Self::MultilevelQueue => "Multilevel Queue",
            Self::MultilevelFeedbackQueue => "Multilevel Feedback Queue",
        }
    }
}

impl FromStr for SchedulerType {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            "priority" | "priority_p" | "prio" => Ok(Self::PriorityPreemptive),
            "priority_np" | "priority_non_preemptive" => Ok(Self::PriorityNonPreemptive),
            "mlq" | "multilevel_queue" => Ok(Self::MultilevelQueue),
            "mlfq" | "multilevel_feedback_queue" => Ok(Self::MultilevelFeedbackQueue),
            _ => Err(SimulationError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for SchedulerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for SchedulerType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulerType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of the execution timeline
///
/// `pid == None` marks either CPU idle time or a context switch; the two
/// are told apart by `is_context_switch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExecutionEvent {
    pub pid: Option<Pid>,
    pub start: Tick,
    pub end: Tick,
    pub is_context_switch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_level: Option<QueueLevel>,
    pub description: String,
}

impl ExecutionEvent {
    /// A slice of CPU time spent on `pid`
    pub fn execution(pid: Pid, start: Tick, end: Tick) -> Self {
        Self {
            pid: Some(pid),
            start,
            end,
            is_context_switch: false,
            queue_level: None,
            description: format!("Execute P{}", pid),
        }
    }

    pub fn context_switch(start: Tick, end: Tick) -> Self {
        Self {
            pid: None,
            start,
            end,
            is_context_switch: true,
            queue_level: None,
            description: "Context Switch".to_string(),
        }
    }

    pub fn idle(start: Tick, end: Tick) -> Self {
        Self {
            pid: None,
            start,
            end,
            is_context_switch: false,
            queue_level: None,
            description: "CPU Idle".to_string(),
        }
    }

    /// Tag the slice with the queue level it was served from
    #[must_use]
    pub fn at_level(mut self, level: QueueLevel) -> Self {
        self.queue_level = Some(level);
        self.description = format!("{} (Q{})", self.description, level);
        self
    }

    #[inline]
    pub fn duration(&self) -> Tick {
        self.end - self.start
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pid.is_none() && !self.is_context_switch
    }

    /// True for slices where a process actually held the CPU
    #[inline]
    pub fn is_execution(&self) -> bool {
        self.pid.is_some() && !self.is_context_switch
    }
}
