/*!
 * Monitoring
 * Tracing setup for the simulator and its binary
 */

mod tracer;

pub use tracer::{init_tracing, RunSpan, ENV_TRACE_JSON};
