//! Dispatch of log records.
//!
//! # Data Flow
//! ```text
//! Logger::log(level, message)
//!     → engine.rs (severity, affixes, fragments, FormattedRecord)
//!     → local writer or host writer (synchronous)
//!     → every configured sink, concurrently:
//!           gate → format → send under deadline
//!     → outcome.rs (per-sink results, `remote()` flag)
//! ```
//!
//! # Responsibilities
//! - Own the effective settings and swap them atomically on `configure`
//! - Isolate sinks from each other and from the caller
//! - Report sink failures as local warnings without recursion
//!
//! # Design Decisions
//! - The caller awaits all sink sends; nothing is left running after `log`
//! - Configuration errors are raised outside production only

pub mod engine;
pub mod outcome;

pub use engine::{Logger, LoggerBuilder};
pub use outcome::{DispatchOutcome, SinkOutcome};
