/*!
 * Scheduler Tests
 * End-to-end runs of every policy through the public contract
 */

use cpu_scheduler_sim::{
    ExecutionEvent, MultilevelFeedbackQueueScheduler, Pid, PriorityScheduler, Process,
    ProcessState, RoundRobinScheduler, Scheduler, SchedulerConfig, SchedulerType, Tick,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn workload() -> Vec<Process> {
    vec![
        Process::new(1, 4, 8, 0),
        Process::new(2, 1, 3, 1),
        Process::new(3, 7, 5, 2),
        Process::new(4, 2, 2, 4),
        Process::new(5, 5, 6, 15),
        Process::new(6, 0, 1, 40),
    ]
}

fn executed_per_pid(timeline: &[ExecutionEvent]) -> HashMap<Pid, Tick> {
    let mut totals = HashMap::new();
    for event in timeline.iter().filter(|e| e.is_execution()) {
        if let Some(pid) = event.pid {
            *totals.entry(pid).or_insert(0) += event.duration();
        }
    }
    totals
}

#[test]
fn test_round_robin_two_processes() {
    let config = SchedulerConfig::default()
        .with_time_quantum(4)
        .with_context_switch_cost(1);
    let mut rr = RoundRobinScheduler::new(config);
    rr.add_process(Process::new(1, 0, 5, 0));
    rr.add_process(Process::new(2, 0, 3, 0));
    rr.run();

    let metrics = rr.metrics();
    assert_eq!(metrics.total_time, 10);
    assert_eq!(metrics.avg_waiting_time, 5.0);
    assert_eq!(metrics.avg_turnaround_time, 9.0);
    assert_eq!(metrics.context_switches, 2);

    let slices: Vec<(Option<Pid>, Tick, Tick)> = rr
        .timeline()
        .iter()
        .map(|e| (e.pid, e.start, e.end))
        .collect();
    assert_eq!(
        slices,
        vec![
            (Some(1), 0, 4),
            (None, 4, 5),
            (Some(2), 5, 8),
            (None, 8, 9),
            (Some(1), 9, 10),
        ]
    );
}

#[test]
fn test_priority_first_dispatch() {
    let mut sched = PriorityScheduler::non_preemptive(SchedulerConfig::default());
    sched.add_process(Process::new(1, 5, 4, 0));
    sched.add_process(Process::new(2, 1, 4, 0));
    sched.add_process(Process::new(3, 3, 4, 0));
    sched.run();

    assert_eq!(sched.timeline()[0].pid, Some(2));
    assert!(!sched.timeline()[0].is_context_switch);
}

#[test]
fn test_mlfq_level_sequence() {
    let config = SchedulerConfig::default().with_time_quantum(2);
    let mut mlfq = MultilevelFeedbackQueueScheduler::new(config);
    mlfq.add_process(Process::new(1, 0, 20, 0));
    mlfq.run();

    let levels: Vec<_> = mlfq
        .timeline()
        .iter()
        .filter(|e| e.is_execution())
        .map(|e| e.queue_level)
        .collect();
    assert_eq!(levels, vec![Some(0), Some(1), Some(2), Some(2)]);
    assert_eq!(
        mlfq.timeline()[1].description,
        "Execute P1 (Q1)".to_string()
    );
}

#[test]
fn test_empty_run_every_algorithm() {
    for kind in SchedulerType::ALL {
        let mut scheduler = kind.build(&SchedulerConfig::default());
        scheduler.run();

        let m = scheduler.metrics();
        assert_eq!(m.process_count, 0, "{}", kind);
        assert_eq!(m.avg_waiting_time, 0.0);
        assert_eq!(m.cpu_utilization, 0.0);
        assert_eq!(m.throughput, 0.0);
        assert!(m.waiting_time_variance.is_finite());
    }
}

#[test]
fn test_conservation_every_algorithm() {
    let base = workload();
    for kind in SchedulerType::ALL {
        let mut scheduler = kind.build(&SchedulerConfig::default());
        scheduler.add_processes(&base);
        scheduler.run();

        assert!(scheduler.is_complete(), "{} left work behind", kind);
        let executed = executed_per_pid(scheduler.timeline());
        for p in scheduler.processes() {
            assert_eq!(executed.get(&p.pid()).copied(), Some(p.burst_time()), "{}", kind);
            assert_eq!(p.waiting_time(), p.turnaround_time() - p.burst_time());
            assert_eq!(p.remaining_time(), 0);
            assert!(p.response_time().is_some());
            assert!(p.response_time().unwrap() <= p.waiting_time());
        }
        assert_eq!(scheduler.metrics().process_count, base.len());
    }
}

#[test]
fn test_idle_gap_before_late_arrival() {
    for kind in SchedulerType::ALL {
        let mut scheduler = kind.build(&SchedulerConfig::default());
        scheduler.add_processes(&workload());
        scheduler.run();

        // P6 arrives at 40, long after everything else has drained
        let idle: Vec<&ExecutionEvent> =
            scheduler.timeline().iter().filter(|e| e.is_idle()).collect();
        assert_eq!(idle.last().map(|e| e.end), Some(40), "{}", kind);
        assert!(scheduler.metrics().idle_time > 0);
    }
}

#[test]
fn test_fresh_instances_agree() {
    for kind in SchedulerType::ALL {
        let config = SchedulerConfig::default();
        let mut a = kind.build(&config);
        let mut b = kind.build(&config);
        a.add_processes(&workload());
        b.add_processes(&workload());
        a.run();
        b.run();

        assert_eq!(a.metrics(), b.metrics());
        assert_eq!(a.timeline(), b.timeline());
    }
}

#[test]
fn test_reset_then_rerun_is_identical() {
    for kind in SchedulerType::ALL {
        let mut scheduler = kind.build(&SchedulerConfig::default());
        scheduler.add_processes(&workload());
        scheduler.run();
        let timeline = scheduler.timeline().to_vec();

        scheduler.reset();
        assert_eq!(scheduler.current_time(), 0);
        assert!(scheduler.timeline().is_empty());
        assert!(!scheduler.is_complete());

        scheduler.run();
        assert_eq!(scheduler.timeline(), timeline.as_slice());
    }
}

#[test]
fn test_next_process_peek() {
    let mut rr = RoundRobinScheduler::new(SchedulerConfig::default());
    rr.add_process(Process::new(1, 0, 3, 0));
    assert!(rr.next_process().is_none());

    let mut prio = PriorityScheduler::preemptive(SchedulerConfig::default());
    prio.add_process(Process::new(1, 0, 3, 0));
    prio.run();
    assert!(prio.next_process().is_none());
}

#[test]
fn test_next_process_picks_staged_ready_process() {
    let staged = |pid, priority, arrival, state| {
        let mut p = Process::new(pid, priority, 3, arrival);
        p.set_state(state);
        p
    };

    let mut prio = PriorityScheduler::preemptive(SchedulerConfig::default().with_aging(false, 1));
    prio.add_process(staged(5, 2, 0, ProcessState::Ready));
    prio.add_process(staged(3, 1, 0, ProcessState::Ready));
    prio.add_process(staged(1, 1, 0, ProcessState::Ready));
    // Better priority but not ready yet
    prio.add_process(staged(2, 0, 0, ProcessState::New));
    // Ready but arrives in the future
    prio.add_process(staged(4, 0, 4, ProcessState::Ready));

    let states = |s: &PriorityScheduler| -> Vec<ProcessState> {
        s.processes().iter().map(Process::state).collect()
    };
    let before = states(&prio);

    // Tie on priority 1 broken by PID
    assert_eq!(prio.next_process().map(Process::pid), Some(1));
    assert_eq!(prio.next_process().map(Process::pid), Some(1));
    assert_eq!(states(&prio), before);
    assert_eq!(prio.current_time(), 0);
    assert!(prio.timeline().is_empty());
}

#[test]
fn test_context_switch_cost_advances_clock() {
    let base = vec![Process::new(1, 0, 3, 0), Process::new(2, 0, 3, 0)];

    let mut free = RoundRobinScheduler::new(SchedulerConfig::default().with_context_switch_cost(0));
    free.add_processes(&base);
    free.run();

    let mut costly =
        RoundRobinScheduler::new(SchedulerConfig::default().with_context_switch_cost(3));
    costly.add_processes(&base);
    costly.run();

    assert_eq!(free.metrics().total_time, 6);
    assert_eq!(costly.metrics().total_time, 9);
    assert_eq!(costly.metrics().context_switch_overhead, 3);
    assert_eq!(free.context_switches(), costly.context_switches());
}
