//! Migfetch error types.

use crate::fetch::FetcherInfo;
use std::sync::Arc;

/// A clonable trait-object inner error.
#[derive(Clone, Default)]
pub struct DynInnerError(
    pub Option<Arc<dyn std::error::Error + 'static + Send + Sync>>,
);

impl std::fmt::Debug for DynInnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for DynInnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            None => f.write_str("None"),
            Some(s) => s.fmt(f),
        }
    }
}

impl std::error::Error for DynInnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.as_ref().map(|s| {
            let out: &(dyn std::error::Error + 'static) = &**s;
            out
        })
    }
}

impl DynInnerError {
    /// Construct a new DynInnerError from a source error.
    pub fn new<E: std::error::Error + 'static + Send + Sync>(e: E) -> Self {
        Self(Some(Arc::new(e)))
    }
}

/// Coarse classification of why a fetch did not produce an artifact.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// The source answered, but does not have the requested artifact.
    NotFound,

    /// The source could not be reached, or did not answer in time.
    Unreachable,

    /// Any other failure (bad response, oversized body, local error).
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::Unreachable => "unreachable",
            Self::Other => "other",
        })
    }
}

/// One failed attempt within a fallback chain.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    /// The fetcher that was tried.
    pub source: FetcherInfo,

    /// Classification of the failure.
    pub kind: FailureKind,

    /// Why the fetcher failed.
    pub reason: MfError,
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.source, self.kind, self.reason)
    }
}

/// Newtype so the failure list can be rendered inside an error message.
#[derive(Debug, Clone)]
pub struct SourceFailures(pub Vec<SourceFailure>);

impl std::ops::Deref for SourceFailures {
    type Target = [SourceFailure];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for SourceFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, failure) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "[{idx}] {failure}")?;
        }
        Ok(())
    }
}

/// The core migfetch error type. This type is used in all external
/// migfetch apis as well as internally in the fetcher modules.
///
/// This type is required to implement `Clone` so that a fallback chain can
/// retain every member failure while still handing errors back to callers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MfError {
    /// Generic internal error.
    #[error("{ctx} (src: {src})")]
    Other {
        /// Any context associated with this error.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: DynInnerError,
    },

    /// The repository configuration could not be read.
    #[error("config read error: {ctx} (src: {src})")]
    ConfigRead {
        /// What could not be read.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: DynInnerError,
    },

    /// A download source token could not be interpreted.
    #[error("invalid download source at index {index} ({token:?}): {reason}")]
    InvalidSource {
        /// Position of the token in the configured list.
        index: usize,

        /// The offending token.
        token: Arc<str>,

        /// Why the token was rejected.
        reason: Arc<str>,
    },

    /// No download sources were configured.
    #[error("no download sources specified")]
    NoSources,

    /// A gateway url uses a scheme other than http or https.
    #[error("unsupported url scheme {scheme:?} for download source at index {index}, must be http or https")]
    UnsupportedScheme {
        /// Position of the token in the configured list.
        index: usize,

        /// The rejected scheme.
        scheme: Arc<str>,
    },

    /// A single fetcher failed to produce the requested artifact.
    #[error("fetch failed ({kind}): {ctx} (src: {src})")]
    Fetch {
        /// Failure classification.
        kind: FailureKind,

        /// Any context associated with this error.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: DynInnerError,
    },

    /// Every member of a fallback chain failed.
    #[error("all download sources failed: {failures}")]
    AllSourcesFailed {
        /// One entry per member, in the order they were tried.
        failures: SourceFailures,
    },

    /// The caller cancelled the operation.
    #[error("fetch cancelled")]
    Cancelled,
}

impl MfError {
    /// Construct an "other" error with an inner source error.
    pub fn other_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        ctx: C,
        src: S,
    ) -> Self {
        Self::Other {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::new(src),
        }
    }

    /// Construct an "other" error.
    pub fn other<C: std::fmt::Display>(ctx: C) -> Self {
        Self::Other {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::default(),
        }
    }

    /// Construct a config read error with an inner source error.
    pub fn config_read_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        ctx: C,
        src: S,
    ) -> Self {
        Self::ConfigRead {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::new(src),
        }
    }

    /// Construct a config read error.
    pub fn config_read<C: std::fmt::Display>(ctx: C) -> Self {
        Self::ConfigRead {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::default(),
        }
    }

    /// Construct a classified fetch error with an inner source error.
    pub fn fetch_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        kind: FailureKind,
        ctx: C,
        src: S,
    ) -> Self {
        Self::Fetch {
            kind,
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::new(src),
        }
    }

    /// Construct a classified fetch error.
    pub fn fetch<C: std::fmt::Display>(kind: FailureKind, ctx: C) -> Self {
        Self::Fetch {
            kind,
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::default(),
        }
    }

    /// Construct an invalid source error.
    pub fn invalid_source<T: AsRef<str>, R: std::fmt::Display>(
        index: usize,
        token: T,
        reason: R,
    ) -> Self {
        Self::InvalidSource {
            index,
            token: token.as_ref().into(),
            reason: reason.to_string().into_boxed_str().into(),
        }
    }

    /// Returns true if this error is a caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classify this error for reporting inside a fallback chain.
    ///
    /// An aggregate error is `NotFound` only if every member said so, and
    /// `Unreachable` only if every member was unreachable.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Fetch { kind, .. } => *kind,
            Self::AllSourcesFailed { failures } => {
                let mut kinds = failures.iter().map(|f| f.kind);
                match kinds.next() {
                    Some(first) if kinds.all(|k| k == first) => first,
                    _ => FailureKind::Other,
                }
            }
            _ => FailureKind::Other,
        }
    }
}

/// The core migfetch result type.
pub type MfResult<T> = Result<T, MfError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            "bla (src: None)",
            MfError::other("bla").to_string().as_str(),
        );
        assert_eq!(
            "foo (src: bar)",
            MfError::other_src("foo", std::io::Error::other("bar"))
                .to_string()
                .as_str(),
        );
        assert_eq!(
            "no download sources specified",
            MfError::NoSources.to_string().as_str(),
        );
        assert_eq!(
            "invalid download source at index 1 (\"\"): empty token",
            MfError::invalid_source(1, "", "empty token")
                .to_string()
                .as_str(),
        );
    }

    #[test]
    fn error_debug() {
        assert_eq!(
            "Other { ctx: \"bla\", src: None }",
            format!("{:?}", MfError::other("bla")).as_str(),
        );
    }

    #[test]
    fn aggregate_failure_kind() {
        let failure = |kind| SourceFailure {
            source: FetcherInfo::ContentNetwork,
            kind,
            reason: MfError::fetch(kind, "test"),
        };

        let all_missing = MfError::AllSourcesFailed {
            failures: SourceFailures(vec![
                failure(FailureKind::NotFound),
                failure(FailureKind::NotFound),
            ]),
        };
        assert_eq!(FailureKind::NotFound, all_missing.failure_kind());

        let mixed = MfError::AllSourcesFailed {
            failures: SourceFailures(vec![
                failure(FailureKind::NotFound),
                failure(FailureKind::Unreachable),
            ]),
        };
        assert_eq!(FailureKind::Other, mixed.failure_kind());
        assert!(mixed.to_string().contains("[1] content-network"));

        assert_eq!(FailureKind::Other, MfError::Cancelled.failure_kind());
    }

    #[test]
    fn ensure_mferror_type_is_send_and_sync() {
        fn ensure<T: std::fmt::Display + Send + Sync>(_t: T) {}
        ensure(MfError::other("bla"));
    }
}
