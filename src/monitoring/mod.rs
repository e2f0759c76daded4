/*!
 * Monitoring Module
 * Tracing setup and trap counters
 */

mod stats;
mod tracer;

pub use stats::TrapStats;
pub use tracer::{init_tracing, TrapSpan};
