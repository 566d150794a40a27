//! A content transport factory that never connects.
//!
//! This is the default when no content network is embedded. Content
//! network sources then fail as unreachable, and a fallback chain moves
//! on to its gateway sources.

use migfetch_api::*;
use std::sync::Arc;

/// A factory whose transports are always unreachable.
#[derive(Debug)]
pub struct NoopContentTransportFactory;

impl NoopContentTransportFactory {
    /// Construct a new NoopContentTransportFactory.
    pub fn create() -> DynContentTransportFactory {
        let out: DynContentTransportFactory = Arc::new(Self);
        out
    }
}

impl ContentTransportFactory for NoopContentTransportFactory {
    fn default_config(&self, _config: &mut Config) -> MfResult<()> {
        Ok(())
    }

    fn connect(
        &self,
        _builder: Arc<Builder>,
        _hints: IpfsHints,
    ) -> BoxFut<'static, MfResult<DynContentTransport>> {
        Box::pin(async move {
            Err(MfError::fetch(
                FailureKind::Unreachable,
                "no content network transport is available",
            ))
        })
    }
}
