/*!
 * Process Record
 * The unit of simulated work and its state machine
 */

use super::types::ProcessState;
use crate::core::types::{Pid, Priority, QueueLevel, Tick};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A simulated process
///
/// Owned by value inside one scheduler for the duration of a run. Input
/// attributes (pid, burst, arrival, base priority) never change; timing
/// outputs are written by the scheduler as the run progresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pid: Pid,
    name: String,
    priority: Priority,
    base_priority: Priority,
    burst_time: Tick,
    remaining_time: Tick,
    arrival_time: Tick,
    waiting_time: Tick,
    turnaround_time: Tick,
    response_time: Option<Tick>,
    completion_time: Option<Tick>,
    queue_level: QueueLevel,
    has_started: bool,
    state: ProcessState,
    // Aging timer; only meaningful while the process is Ready
    #[serde(skip)]
    waiting_since: Option<Tick>,
}

impl Process {
    /// Create a new process named `P<pid>`
    #[must_use]
    pub fn new(pid: Pid, priority: Priority, burst_time: Tick, arrival_time: Tick) -> Self {
        Self {
            pid,
            name: format!("P{}", pid),
            priority,
            base_priority: priority,
            burst_time,
            remaining_time: burst_time,
            arrival_time,
            waiting_time: 0,
            turnaround_time: 0,
            response_time: None,
            completion_time: None,
            queue_level: 0,
            has_started: false,
            state: ProcessState::New,
            waiting_since: None,
        }
    }

    /// Override the display name (empty names keep the default)
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.name = name;
        }
        self
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective priority (may have been lowered by aging during a run)
    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Priority the process was created with
    #[inline]
    pub fn base_priority(&self) -> Priority {
        self.base_priority
    }

    #[inline]
    pub fn burst_time(&self) -> Tick {
        self.burst_time
    }

    #[inline]
    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }

    #[inline]
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    #[inline]
    pub fn waiting_time(&self) -> Tick {
        self.waiting_time
    }

    #[inline]
    pub fn turnaround_time(&self) -> Tick {
        self.turnaround_time
    }

    /// Time from arrival to first dispatch, `None` until dispatched
    #[inline]
    pub fn response_time(&self) -> Option<Tick> {
        self.response_time
    }

    #[inline]
    pub fn completion_time(&self) -> Option<Tick> {
        self.completion_time
    }

    #[inline]
    pub fn queue_level(&self) -> QueueLevel {
        self.queue_level
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn waiting_since(&self) -> Option<Tick> {
        self.waiting_since
    }

    #[inline(always)]
    pub fn is_completed(&self) -> bool {
        self.remaining_time == 0
    }

    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ProcessState::Ready)
    }

    #[inline(always)]
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }

    /// Force a state tag (used by loaders and tests to stage processes)
    pub fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Run for up to `time_slice` ticks
    ///
    /// Returns the ticks actually consumed, `min(time_slice, remaining)`.
    /// A finished process consumes nothing and keeps its state.
    pub fn execute(&mut self, time_slice: Tick) -> Tick {
        if self.remaining_time == 0 {
            return 0;
        }

        self.has_started = true;

        let executed = time_slice.min(self.remaining_time);
        self.remaining_time -= executed;

        self.state = if self.remaining_time == 0 {
            ProcessState::Terminated
        } else {
            ProcessState::Running
        };

        executed
    }

    /// Restore the process to its pre-run state
    pub fn reset(&mut self) {
        self.remaining_time = self.burst_time;
        self.priority = self.base_priority;
        self.waiting_time = 0;
        self.turnaround_time = 0;
        self.response_time = None;
        self.completion_time = None;
        self.queue_level = 0;
        self.has_started = false;
        self.state = ProcessState::New;
        self.waiting_since = None;
    }

    /// Ordering used for priority selection: priority value, then arrival, then PID
    pub fn priority_order(&self, other: &Self) -> Ordering {
        self.scheduling_key().cmp(&other.scheduling_key())
    }

    #[inline]
    pub fn scheduling_key(&self) -> (Priority, Tick, Pid) {
        (self.priority, self.arrival_time, self.pid)
    }

    // =========================================================================
    // Scheduler-side transitions
    // =========================================================================

    pub(crate) fn mark_ready(&mut self) {
        debug_assert!(
            !self.is_terminated(),
            "Terminated process {} cannot become ready",
            self.pid
        );
        self.state = ProcessState::Ready;
    }

    /// Transition to Running at `now`, stamping the response time once
    pub(crate) fn mark_running(&mut self, now: Tick) {
        debug_assert!(
            self.state == ProcessState::Ready,
            "Process {} dispatched from {:?}",
            self.pid,
            self.state
        );
        if self.response_time.is_none() {
            self.response_time = Some(now.saturating_sub(self.arrival_time));
        }
        self.waiting_since = None;
        self.state = ProcessState::Running;
    }

    /// Return a running process with work left to the ready set
    pub(crate) fn preempt(&mut self, now: Tick) {
        debug_assert!(self.remaining_time > 0, "Preempting finished process {}", self.pid);
        self.state = ProcessState::Ready;
        self.waiting_since = Some(now);
    }

    /// Stamp completion and derive turnaround and waiting time
    pub(crate) fn finalize(&mut self, now: Tick) {
        assert!(
            self.remaining_time == 0 && self.state == ProcessState::Terminated,
            "Finalizing process {} with {} ticks left",
            self.pid,
            self.remaining_time
        );
        assert!(
            self.completion_time.is_none(),
            "Process {} completed twice",
            self.pid
        );

        self.completion_time = Some(now);
        self.turnaround_time = now - self.arrival_time;
        assert!(
            self.turnaround_time >= self.burst_time,
            "Process {} turnaround {} shorter than burst {}",
            self.pid,
            self.turnaround_time,
            self.burst_time
        );
        self.waiting_time = self.turnaround_time - self.burst_time;
    }

    pub(crate) fn set_queue_level(&mut self, level: QueueLevel) {
        self.queue_level = level;
    }

    pub(crate) fn start_waiting(&mut self, since: Tick) {
        self.waiting_since = Some(since);
    }

    /// Age a ready process; returns true if its priority improved
    ///
    /// Once the process has waited `threshold` ticks unserved its priority
    /// value drops by one (saturating at 0) and the timer restarts.
    pub(crate) fn age(&mut self, now: Tick, threshold: Tick) -> bool {
        if self.state != ProcessState::Ready {
            return false;
        }

        let since = *self.waiting_since.get_or_insert(now);
        if now.saturating_sub(since) < threshold {
            return false;
        }

        self.waiting_since = Some(now);
        if self.priority == 0 {
            return false;
        }
        self.priority -= 1;
        true
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Process[PID={}, Name={}, Priority={}, Burst={}, Remaining={}, Arrival={}, State={}]",
            self.pid,
            self.name,
            self.priority,
            self.burst_time,
            self.remaining_time,
            self.arrival_time,
            self.state
        )
    }
}
