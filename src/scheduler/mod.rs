/*!
 * Scheduler Module
 * Dispatch policies and the shared scheduling contract
 */

pub mod config;
pub mod core;
pub mod feedback;
pub mod multilevel;
pub mod priority;
pub mod round_robin;
pub mod traits;
pub mod types;

// Re-export public API
pub use self::config::SchedulerConfig;
pub use self::core::SchedulerCore;
pub use feedback::MultilevelFeedbackQueueScheduler;
pub use multilevel::{MultilevelQueueScheduler, QueueClass, QueueConfig};
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use traits::Scheduler;
pub use types::{ExecutionEvent, SchedulerType};

impl SchedulerType {
    /// Construct a fresh, empty scheduler of this kind
    pub fn build(self, config: &SchedulerConfig) -> Box<dyn Scheduler> {
        let config = config.clone();
        match self {
            SchedulerType::RoundRobin => Box::new(RoundRobinScheduler::new(config)),
            SchedulerType::PriorityPreemptive => Box::new(PriorityScheduler::preemptive(config)),
            SchedulerType::PriorityNonPreemptive => {
                Box::new(PriorityScheduler::non_preemptive(config))
            }
            SchedulerType::MultilevelQueue => Box::new(MultilevelQueueScheduler::new(config)),
            SchedulerType::MultilevelFeedbackQueue => {
                Box::new(MultilevelFeedbackQueueScheduler::new(config))
            }
        }
    }
}
