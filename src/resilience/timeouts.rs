//! Send deadlines.
//!
//! # Responsibilities
//! - Wrap one sink send with an optional deadline
//! - Abandon the send when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from transport errors (`SinkError::Timeout`)
//! - No deadline unless a sink opts in

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::error::SinkError;

/// Run `send`, giving up after `deadline` if one is set.
pub async fn with_deadline<F>(deadline: Option<Duration>, send: F) -> Result<(), SinkError>
where
    F: Future<Output = Result<(), SinkError>>,
{
    match deadline {
        None => send.await,
        Some(limit) => match timeout(limit, send).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Timeout(limit.as_millis() as u64)),
        },
    }
}
