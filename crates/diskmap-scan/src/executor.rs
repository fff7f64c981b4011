//! One-shot scan execution off the caller's context.

use diskmap_core::{DiskNode, ScanConfig, ScanError};
use tokio::sync::oneshot;

use crate::builder::TreeBuilder;

/// Submit a scan for execution on an isolated task.
///
/// Each call spawns one task owning a private copy of the config. The
/// task runs the tree build to completion on the blocking pool and
/// delivers exactly one result through the returned receiver, then
/// terminates; tasks are never reused across requests. There is no
/// cancellation: a submitted scan runs to completion or fault, and a
/// caller that loses interest simply drops the receiver.
pub fn submit(config: ScanConfig) -> oneshot::Receiver<Result<DiskNode, ScanError>> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || TreeBuilder::new(&config).build())
            .await
            .unwrap_or_else(|join_err| {
                Err(ScanError::WorkerFailed {
                    message: join_err.to_string(),
                })
            });

        // The receiver may already be gone; the result is then discarded.
        let _ = tx.send(result);
    });

    rx
}

/// Submit a scan and await its single result.
pub async fn scan(config: ScanConfig) -> Result<DiskNode, ScanError> {
    submit(config).await.unwrap_or_else(|_| {
        Err(ScanError::WorkerFailed {
            message: "scan task dropped before delivering a result".to_string(),
        })
    })
}
