/*!
 * Property Tests
 * Invariants that must hold for arbitrary workloads and configurations
 */

use cpu_scheduler_sim::{
    MultilevelFeedbackQueueScheduler, PriorityScheduler, Process, RoundRobinScheduler, Scheduler,
    SchedulerConfig, SchedulerType, Tick,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn workload_strategy() -> impl Strategy<Value = Vec<Process>> {
    prop::collection::vec((0u32..=10, 1u64..=20, 0u64..=30), 0..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (priority, burst, arrival))| Process::new(i as u32, priority, burst, arrival))
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = SchedulerConfig> {
    (0u64..=6, 0u64..=3, 1usize..=4, any::<bool>(), 1u64..=15).prop_map(
        |(quantum, cost, queues, aging, threshold)| {
            SchedulerConfig::default()
                .with_time_quantum(quantum)
                .with_context_switch_cost(cost)
                .with_num_queues(queues)
                .with_aging(aging, threshold)
        },
    )
}

fn run(kind: SchedulerType, config: &SchedulerConfig, base: &[Process]) -> Box<dyn Scheduler> {
    let mut scheduler = kind.build(config);
    scheduler.add_processes(base);
    scheduler.run();
    scheduler
}

proptest! {
    /// Every process finishes with waiting == turnaround - burst and its burst fully executed
    #[test]
    fn prop_conservation(base in workload_strategy(), config in config_strategy()) {
        for kind in SchedulerType::ALL {
            let scheduler = run(kind, &config, &base);
            prop_assert!(scheduler.is_complete());

            let mut executed: HashMap<u32, Tick> = HashMap::new();
            for event in scheduler.timeline().iter().filter(|e| e.is_execution()) {
                *executed.entry(event.pid.unwrap_or_default()).or_insert(0) += event.duration();
            }

            for p in scheduler.processes() {
                prop_assert_eq!(p.waiting_time(), p.turnaround_time() - p.burst_time());
                prop_assert_eq!(executed.get(&p.pid()).copied(), Some(p.burst_time()));
                prop_assert_eq!(p.completion_time(), Some(p.arrival_time() + p.turnaround_time()));
            }
        }
    }

    /// The timeline tiles [0, total_time) without gaps or overlaps
    #[test]
    fn prop_timeline_is_contiguous(base in workload_strategy(), config in config_strategy()) {
        for kind in SchedulerType::ALL {
            let scheduler = run(kind, &config, &base);
            let mut cursor = 0;
            for event in scheduler.timeline() {
                prop_assert_eq!(event.start, cursor, "{} gap or overlap", kind);
                prop_assert!(event.end >= event.start);
                cursor = event.end;
            }
            prop_assert_eq!(cursor, scheduler.current_time());
            prop_assert_eq!(scheduler.metrics().total_time, scheduler.current_time());
        }
    }

    /// Two fresh instances over the same input agree exactly
    #[test]
    fn prop_deterministic(base in workload_strategy(), config in config_strategy()) {
        for kind in SchedulerType::ALL {
            let a = run(kind, &config, &base);
            let b = run(kind, &config, &base);
            prop_assert_eq!(a.metrics(), b.metrics());
            prop_assert_eq!(a.timeline(), b.timeline());
        }
    }

    /// Round Robin never runs a slice longer than its quantum
    #[test]
    fn prop_round_robin_quantum_bound(base in workload_strategy(), config in config_strategy()) {
        let mut rr = RoundRobinScheduler::new(config);
        rr.add_processes(&base);
        rr.run();

        let quantum = rr.quantum();
        prop_assert!(quantum > 0);
        for event in rr.timeline().iter().filter(|e| e.is_execution()) {
            prop_assert!(event.duration() <= quantum);
        }
    }

    /// Without boosting, a full-quantum slice with work left demotes exactly one level
    #[test]
    fn prop_mlfq_demotion(base in workload_strategy(), config in config_strategy()) {
        let config = config.with_aging(false, 1);
        let mut mlfq = MultilevelFeedbackQueueScheduler::new(config);
        mlfq.add_processes(&base);
        mlfq.run();

        let last = mlfq.num_levels() - 1;
        let mut previous: HashMap<u32, (usize, Tick)> = HashMap::new();
        for event in mlfq.timeline().iter().filter(|e| e.is_execution()) {
            let pid = event.pid.unwrap_or_default();
            let level = event.queue_level.unwrap_or_default();
            if let Some(&(prev_level, prev_len)) = previous.get(&pid) {
                prop_assert_eq!(prev_len, mlfq.quantums()[prev_level]);
                prop_assert_eq!(level, (prev_level + 1).min(last));
            } else {
                prop_assert_eq!(level, 0);
            }
            previous.insert(pid, (level, event.duration()));
        }
    }

    /// With aging off, the first dispatch among simultaneous arrivals has the lowest priority value
    #[test]
    fn prop_priority_picks_lowest_first(
        priorities in prop::collection::hash_set(0u32..50, 1..8),
        preemptive in any::<bool>(),
    ) {
        let base: Vec<Process> = priorities
            .iter()
            .enumerate()
            .map(|(i, &priority)| Process::new(i as u32, priority, 3, 0))
            .collect();
        let lowest = base.iter().min_by_key(|p| p.priority()).map(Process::pid);

        let config = SchedulerConfig::default().with_aging(false, 1);
        let mut sched = PriorityScheduler::new(preemptive, config);
        sched.add_processes(&base);
        sched.run();

        prop_assert_eq!(sched.timeline()[0].pid, lowest);

        let order: Vec<u32> = sched
            .timeline()
            .iter()
            .filter(|e| e.is_execution())
            .filter_map(|e| e.pid)
            .collect();
        let mut expected = base.clone();
        expected.sort_by_key(|p| p.priority());
        prop_assert_eq!(order, expected.iter().map(Process::pid).collect::<Vec<_>>());
    }
}
