/*!
 * Process Module
 * Simulated processes and their lifecycle
 */

pub mod record;
pub mod types;

// Re-export for convenience
pub use record::Process;
pub use types::ProcessState;
