//! A fallback chain of fetchers.
//!
//! A fetch request is handed to each member in order, strictly one at a
//! time. The first member to succeed wins and the remaining members are
//! not tried. Any member error moves on to the next member with the same
//! request; nothing from a failed attempt is kept.
//!
//! If every member fails, the result is [MfError::AllSourcesFailed],
//! listing one [SourceFailure] per member so callers can tell "nothing was
//! reachable" apart from "nobody had it".
//!
//! Cancellation is different from failure: once the caller's token fires,
//! the chain stops and returns [MfError::Cancelled] without trying any
//! further members.

use bytes::Bytes;
use migfetch_api::*;

/// MultiFetcher configuration types.
pub mod config {
    /// Configuration parameters for [MultiFetcher](super::MultiFetcher).
    #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct MultiFetcherConfig {
        /// Time limit in ms for each member attempt, 0 for none. An attempt
        /// that runs out of time counts as an unreachable source.
        /// Default: 0.
        pub attempt_timeout_ms: u32,
    }

    impl MultiFetcherConfig {
        /// Get the per-attempt timeout, if one is set.
        pub fn attempt_timeout(&self) -> Option<std::time::Duration> {
            match self.attempt_timeout_ms {
                0 => None,
                ms => Some(std::time::Duration::from_millis(ms as u64)),
            }
        }
    }

    /// Module-level configuration for MultiFetcher.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MultiFetcherModConfig {
        /// MultiFetcher configuration.
        #[serde(default)]
        pub multi_fetcher: MultiFetcherConfig,
    }

    impl migfetch_api::ModConfig for MultiFetcherModConfig {}
}

pub use config::*;

/// Tries each member fetcher in order until one succeeds.
#[derive(Debug)]
pub struct MultiFetcher {
    members: Vec<DynFetcher>,
    attempt_timeout: Option<std::time::Duration>,
}

impl MultiFetcher {
    /// Construct a chain over `members`, which it takes ownership of.
    pub fn new(config: &MultiFetcherConfig, members: Vec<DynFetcher>) -> Self {
        Self {
            members,
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// The number of members in this chain.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if this chain has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    async fn attempt(
        &self,
        member: &DynFetcher,
        path: &str,
        cancel: CancellationToken,
    ) -> MfResult<Bytes> {
        let fut = member.fetch(path, cancel.clone());
        let fut = async move {
            match self.attempt_timeout {
                None => fut.await,
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(res) => res,
                    Err(_) => Err(MfError::fetch(
                        FailureKind::Unreachable,
                        format!("attempt timed out after {limit:?}"),
                    )),
                },
            }
        };

        // members that ignore the token are dropped mid-flight
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(MfError::Cancelled),
            res = fut => res,
        }
    }
}

impl Fetcher for MultiFetcher {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        cancel: CancellationToken,
    ) -> BoxFut<'a, MfResult<Bytes>> {
        Box::pin(async move {
            let mut failures = Vec::with_capacity(self.members.len());

            for (idx, member) in self.members.iter().enumerate() {
                if cancel.is_cancelled() {
                    return Err(MfError::Cancelled);
                }

                let source = member.info();
                tracing::debug!(idx, %source, path, "trying download source");

                match self.attempt(member, path, cancel.clone()).await {
                    Ok(data) => {
                        tracing::info!(idx, %source, path, "fetched");
                        return Ok(data);
                    }
                    Err(err) if err.is_cancelled() || cancel.is_cancelled() => {
                        return Err(MfError::Cancelled);
                    }
                    Err(err) => {
                        tracing::warn!(
                            idx,
                            %source,
                            path,
                            %err,
                            "download source failed"
                        );
                        failures.push(SourceFailure {
                            source,
                            kind: err.failure_kind(),
                            reason: err,
                        });
                    }
                }
            }

            Err(MfError::AllSourcesFailed {
                failures: SourceFailures(failures),
            })
        })
    }

    fn close(&self) -> BoxFut<'_, MfResult<()>> {
        Box::pin(async move {
            let results = futures::future::join_all(
                self.members.iter().map(|member| member.close()),
            )
            .await;

            let mut first_err = None;
            for (idx, res) in results.into_iter().enumerate() {
                if let Err(err) = res {
                    tracing::warn!(idx, %err, "failed to close download source");
                    first_err.get_or_insert(err);
                }
            }

            match first_err {
                None => Ok(()),
                Some(err) => Err(err),
            }
        })
    }

    fn info(&self) -> FetcherInfo {
        FetcherInfo::Fallback {
            members: self.members.iter().map(|m| m.info()).collect(),
        }
    }
}

#[cfg(test)]
mod test;
