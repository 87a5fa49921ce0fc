//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! LogOptions (code, or TOML file via loader.rs + validation.rs)
//!     → merged over the previous options (schema.rs, Merge)
//!     → resolver.rs (+ env.rs defaults, TransportFactory)
//!     → Settings (effective, immutable)
//!     → atomic swap inside the Logger; every log call reads a snapshot
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads + validates
//!     → Logger::configure (same merge path)
//! ```
//!
//! # Design Decisions
//! - Options are partial; absence never erases a configured value
//! - Resolution never fails; unusable sinks are disabled with a warning
//! - Environment and package descriptor are injected, not read globally

pub mod env;
pub mod loader;
pub mod package;
pub mod resolver;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use env::Environment;
pub use package::PackageInfo;
pub use resolver::{Resolution, Resolver, Settings};
pub use schema::{
    Affix, BetterstackOptions, ErrorOptions, HostContextOptions, LogOptions, Merge, RemoteOptions,
    SyslogOptions, SyslogProtocol, TeamsOptions,
};
