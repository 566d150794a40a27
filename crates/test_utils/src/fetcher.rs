//! Scripted fetchers for exercising fallback behavior.

use bytes::Bytes;
use migfetch_api::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a [MockFetcher] does when asked to fetch.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return these bytes.
    Ok(Bytes),

    /// Fail with a fetch error of this kind.
    Fail(FailureKind),

    /// Return these bytes after a delay, unless cancelled first.
    Delay(Duration, Bytes),

    /// Never complete on its own, only resolve on cancellation.
    Hang,

    /// Cancel the caller's token, then fail with an ordinary error.
    CancelThenFail,

    /// Wait out the delay without watching the token, then fail.
    IgnoreCancel(Duration),
}

/// A fetcher that follows a fixed script and records how it was used.
#[derive(Debug)]
pub struct MockFetcher {
    label: String,
    outcome: MockOutcome,
    calls: AtomicUsize,
    closed: AtomicBool,
    paths: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Construct a new mock fetcher. `label` is reported as its gateway.
    pub fn create(label: &str, outcome: MockOutcome) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            outcome,
            calls: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            paths: Mutex::new(Vec::new()),
        })
    }

    /// How many times fetch was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether close was called.
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Every path requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        cancel: CancellationToken,
    ) -> BoxFut<'a, MfResult<Bytes>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.paths.lock().unwrap().push(path.to_string());

            match &self.outcome {
                MockOutcome::Ok(data) => Ok(data.clone()),
                MockOutcome::Fail(kind) => Err(MfError::fetch(
                    *kind,
                    format!("{} failed {path}", self.label),
                )),
                MockOutcome::Delay(wait, data) => {
                    tokio::select! {
                        _ = tokio::time::sleep(*wait) => Ok(data.clone()),
                        _ = cancel.cancelled() => Err(MfError::Cancelled),
                    }
                }
                MockOutcome::Hang => {
                    cancel.cancelled().await;
                    Err(MfError::Cancelled)
                }
                MockOutcome::IgnoreCancel(wait) => {
                    tokio::time::sleep(*wait).await;
                    Err(MfError::fetch(
                        FailureKind::Unreachable,
                        format!("{} gave up", self.label),
                    ))
                }
                MockOutcome::CancelThenFail => {
                    cancel.cancel();
                    Err(MfError::fetch(
                        FailureKind::Unreachable,
                        format!("{} went away", self.label),
                    ))
                }
            }
        })
    }

    fn close(&self) -> BoxFut<'_, MfResult<()>> {
        self.closed.store(true, Ordering::SeqCst);
        Box::pin(async move { Ok(()) })
    }

    fn info(&self) -> FetcherInfo {
        FetcherInfo::Gateway {
            gateway: self.label.clone(),
        }
    }
}
