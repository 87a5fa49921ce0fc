//! Message model.
//!
//! # Data Flow
//! ```text
//! caller value (text | number | JSON | error | list)
//!     → fragment.rs (Message = ordered Fragments)
//!     → render with ErrorPolicy (one text per fragment)
//!     → decoration (invocation id, prefix, suffix) in the dispatch engine
//!     → format.rs (FormattedRecord: local, remote, host, chat cards)
//! ```

pub mod format;
pub mod fragment;

pub use format::{ChatCards, FormattedRecord};
pub use fragment::{ErrorPolicy, Fragment, Message};
