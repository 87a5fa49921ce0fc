//! Local line writer.
//!
//! The last line of defence: when everything else fails the record must still
//! be visible here, so a panicking writer is contained and reported as a
//! failed write instead of unwinding into the caller.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A callable receiving one fully formatted line.
#[derive(Clone)]
pub struct LineWriter(Arc<dyn Fn(&str) + Send + Sync>);

impl LineWriter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Writes to standard output.
    pub fn stdout() -> Self {
        Self::new(|line| println!("{line}"))
    }

    /// Writes to standard error.
    pub fn stderr() -> Self {
        Self::new(|line| eprintln!("{line}"))
    }

    /// Invoke the writer. Returns `false` if it panicked.
    pub fn write(&self, line: &str) -> bool {
        let ok = catch_unwind(AssertUnwindSafe(|| (self.0)(line))).is_ok();
        if !ok {
            tracing::error!("local writer panicked; line dropped");
        }
        ok
    }
}

impl Default for LineWriter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for LineWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LineWriter(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_writer_receives_line() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let writer = LineWriter::new(move |l| sink.lock().unwrap().push(l.to_string()));

        assert!(writer.write("hello"));
        assert_eq!(*lines.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_panicking_writer_is_contained() {
        let writer = LineWriter::new(|_| panic!("broken console"));
        assert!(!writer.write("hello"));
    }
}
